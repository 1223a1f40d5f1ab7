//! Generation: everything between an uploaded resume and a finished
//! portfolio document.

pub mod finalize;
pub mod handlers;
pub mod pdf_text;
pub mod prompts;
pub mod resume;
pub mod sections;
pub mod suggest;
