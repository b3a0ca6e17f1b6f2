pub mod flash;
pub mod html;
pub mod time;
