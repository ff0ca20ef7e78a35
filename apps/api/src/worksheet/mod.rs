// Worksheet builder: selection of problems, live grid preview, submission to the remote
// renderer and management of generated worksheets.

pub mod handlers;
pub mod selection;
