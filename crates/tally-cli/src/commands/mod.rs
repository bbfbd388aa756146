pub mod count;
pub mod discover;
pub mod dispatch;
pub mod index;
pub mod run;
