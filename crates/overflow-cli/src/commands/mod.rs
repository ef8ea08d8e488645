pub mod answer;
pub mod front;
pub mod init;
pub mod question;
pub mod search;
pub mod status;
pub mod tag;
pub mod user;
pub mod vote;
