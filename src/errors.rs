use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Caller lacks the required role for this entrypoint (Error code: -4).
    Unauthorized,
    /// Operation is not permitted in the current auction phase
    /// (Error code: -5).
    InvalidState,
    /// The minimum step of an auction rule must be positive (Error code: -6).
    ZeroMinimumStep,
    /// Caller or queried account is not a registered bidder (Error code: -7).
    UnknownBidder,
    /// Raised if bid does not reach the current price plus the minimum step
    /// (Error code: -8).
    BidTooLow,
    /// Only account addresses can take part in the auction (Error code: -9).
    OnlyAccountAddress,
    /// The winner cannot reclaim their deposit, it is forfeit as the sale
    /// price (Error code: -10).
    WinnerCannotWithdraw,
}

pub type ContractResult<A> = Result<A, CustomContractError>;

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}
