pub mod shorts_limit;
