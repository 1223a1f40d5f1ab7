//! Design discovery: finding reference portfolio sites, scraping them for
//! structural samples, and condensing the result into a prose summary that
//! the section generator can consume.

pub mod handlers;
pub mod prompts;
pub mod scraper;
pub mod search;
pub mod summary;
