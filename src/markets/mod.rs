//! Market-clearing protocols: goods, labour and credit.

pub mod credit;
pub mod goods;
pub mod labor;

pub use credit::CreditMarket;
pub use goods::GoodsMarket;
pub use labor::LaborMarket;
