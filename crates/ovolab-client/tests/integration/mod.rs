mod auth;
mod autosave;
mod batch;
mod donadoras;
mod drafts;
mod errors;
mod stores;
mod submit;
