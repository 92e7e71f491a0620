pub mod mock;

#[cfg(test)]
mod probe;
