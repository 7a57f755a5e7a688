/// Try-on generation module
///
/// This module handles:
/// - Copying user-picked photos and items into the uploads directory
/// - Calling the remote image-edits API and saving its result

pub mod client;
pub mod upload;
