mod time_keyed;

#[cfg(test)]
mod tests;

pub use time_keyed::TimeKeyedStore;
