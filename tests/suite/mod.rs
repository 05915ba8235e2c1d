mod cart;
mod catalog;
mod filter;
