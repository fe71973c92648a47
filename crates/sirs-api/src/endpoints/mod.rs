mod accounts;
mod catalog;
mod operations;
