pub mod page;

pub use page::SpotPageProvider;
