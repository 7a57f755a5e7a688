/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures for catalog items and pages (data.rs)
/// - The UI session: pages, selection list, photo and result (session.rs)

pub mod data;
pub mod session;
