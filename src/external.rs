use super::*;

/// Number of tokens, the unit all prices and deposits are denominated in.
pub type TokenAmount = u64;

/// Type of the parameter to the `init` function.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct InitParameter {
    /// Price the bidding starts from.
    pub starting_price: TokenAmount,
    /// Smallest allowed increment over the current price.
    pub minimum_step: TokenAmount,
}

/// Type of the parameter to the `register` entrypoint.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct RegisterParams {
    /// Account to register as a bidder.
    pub bidder: AccountAddress,
    /// Token allotment of the bidder.
    pub token: TokenAmount,
}

/// Type of the parameter to the `bid` entrypoint.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub struct BidParams {
    /// Amount of tokens offered and escrowed with this bid.
    pub amount: TokenAmount,
}
