pub mod fizzbuzz;
pub mod stats;

pub use fizzbuzz::FizzBuzzService;
pub use stats::StatsService;
