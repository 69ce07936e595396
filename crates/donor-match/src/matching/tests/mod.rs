mod common;
mod compatibility;
