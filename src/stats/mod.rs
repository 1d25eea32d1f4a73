//! Statistics module - HR aggregations over the employee table

mod counts;
mod dashboard;
mod error;
mod headcount;
mod summary;

pub use counts::{CategoryCount, CountCalculator, GroupedCounts};
pub use dashboard::DashboardData;
pub use headcount::{AttritionRate, HeadcountSeries};
