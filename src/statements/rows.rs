//! The fixed line items of the three statement kinds. Row names double as
//! the keys of the persisted JSON tables, so they are stable identifiers.

pub const BITCOIN_PRICE: &str = "Bitcoin Price";
pub const TRANSACTION_FEES: &str = "Transaction Fees";
pub const NETWORK_HASH_RATE: &str = "Network Hash Rate";
pub const DIFFICULTY: &str = "Difficulty";
pub const BLOCK_SUBSIDY: &str = "Block Subsidy";
pub const BLOCK_REWARD: &str = "Block Reward";

pub const NUMBER_OF_RIGS: &str = "Number of Rigs";
pub const HASH_RATE: &str = "Hash Rate";
pub const HASH_SHARE: &str = "Hash Share";
pub const BTC_EARNED: &str = "BTC Earned";
pub const POOL_FEES: &str = "Pool Fees";
pub const NET_BTC_EARNED: &str = "Net BTC Earned";
pub const GROSS_REVENUE: &str = "Gross Revenue";
pub const POWER_COST: &str = "Power Cost";
pub const OPEX: &str = "Opex";
pub const PROPERTY_TAXES: &str = "Property Taxes";
pub const GROSS_PROFIT: &str = "Gross Profit";
pub const TAXES: &str = "Taxes";
pub const NET_INCOME: &str = "Net Income";

pub const CAPITAL_EXPENDITURE: &str = "Capital Expenditure";
pub const CUMULATIVE_CASH_FLOW: &str = "Cumulative Cash Flow";
pub const ROI: &str = "ROI";
pub const PAYBACK: &str = "Payback";
