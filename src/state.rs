use super::*;

/// Number of `announce` calls since the session start that closes the
/// auction. Models the auctioneer counting "going once, going twice, going
/// three times, sold".
pub const ANNOUNCEMENT_LIMIT: u32 = 4;

/// The phase an auction can be in. Transitions are one-directional:
/// `Created` to `Started` to `Closing`, never backwards.
#[derive(Debug, Serialize, SchemaType, Eq, PartialEq, Clone)]
pub enum AuctionState {
    /// Instance exists, bidders can be registered, no bids yet.
    Created,
    /// The bidding session is open.
    Started,
    /// The auction is over and the winner is final.
    Closing,
}

/// Immutable pricing rule, fixed on initialization.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Price the bidding starts from.
    pub starting_price: TokenAmount,
    /// Smallest allowed increment over the current price. Always positive.
    pub minimum_step: TokenAmount,
}

/// Ledger entry of a registered bidder. The bidder's account address is the
/// key of the `bidders` map. Entries are never removed.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct Bidder {
    /// Total token allotment of the bidder.
    pub token: TokenAmount,
    /// Tokens currently escrowed on the bidder's behalf.
    pub deposit: TokenAmount,
}

/// Result of a successful announcement.
#[must_use]
pub enum AnnounceOutcome {
    /// The counter advanced, the session is still open.
    Counting(u32),
    /// The announcement limit was reached, the auction is closed.
    Closed {
        winner: Option<AccountAddress>,
        price: TokenAmount,
    },
}

/// The part of the state to be viewed using `concordium-client contract
/// invoke`.
#[derive(Debug, Serialize, SchemaType, Clone)]
pub struct ViewableState {
    /// Current auction phase.
    pub auction_state: AuctionState,
    /// The pricing rule.
    pub rule: Rule,
    /// Highest accepted bid so far, or the starting price if there is none.
    pub current_price: TokenAmount,
    /// Bidder whose bid produced the current price, if any.
    pub current_winner: Option<AccountAddress>,
    /// Number of announcements made since the session start.
    pub announcement_times: u32,
    /// The only account allowed to register bidders, start the session and
    /// announce.
    pub auctioneer: AccountAddress,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// The part of the state that can be viewed.
    pub viewable_state: ViewableState,
    /// Keeping track of each registered bidder's allotment and deposit.
    pub bidders: StateMap<AccountAddress, Bidder, S>,
}

// Functions for creating, updating and querying the contract state. Every
// mutating function performs all of its checks before touching any field,
// so a rejected call leaves the state unchanged.
impl<S: HasStateApi> State<S> {
    /// Create the state of a fresh auction with no bidders.
    pub fn new(state_builder: &mut StateBuilder<S>, rule: Rule, auctioneer: AccountAddress) -> Self {
        State {
            viewable_state: ViewableState {
                auction_state: AuctionState::Created,
                rule,
                current_price: rule.starting_price,
                current_winner: None,
                announcement_times: 0,
                auctioneer,
            },
            bidders: state_builder.new_map(),
        }
    }

    /// Insert or overwrite a bidder record with a zero deposit. Only the
    /// auctioneer may register, and only before the session starts.
    pub fn register(
        &mut self,
        sender: &Address,
        bidder: AccountAddress,
        token: TokenAmount,
    ) -> ContractResult<()> {
        ensure!(
            sender.matches_account(&self.viewable_state.auctioneer),
            CustomContractError::Unauthorized
        );
        ensure!(
            self.viewable_state.auction_state == AuctionState::Created,
            CustomContractError::InvalidState
        );

        self.bidders.insert(bidder, Bidder { token, deposit: 0 });

        Ok(())
    }

    /// Open the bidding session. Fails on any repeat call, the transition
    /// is never re-executed.
    pub fn start_session(&mut self, sender: &Address) -> ContractResult<()> {
        ensure!(
            sender.matches_account(&self.viewable_state.auctioneer),
            CustomContractError::Unauthorized
        );
        ensure!(
            self.viewable_state.auction_state == AuctionState::Created,
            CustomContractError::InvalidState
        );

        self.viewable_state.auction_state = AuctionState::Started;

        Ok(())
    }

    /// Accept a bid from a registered bidder. The full amount is escrowed on
    /// top of any earlier deposit of the same bidder; superseded bids are
    /// only refunded after the close via [`State::get_deposit`].
    pub fn bid(&mut self, bidder: AccountAddress, amount: TokenAmount) -> ContractResult<()> {
        ensure!(
            self.viewable_state.auction_state == AuctionState::Started,
            CustomContractError::InvalidState
        );

        {
            let mut entry = self
                .bidders
                .get_mut(&bidder)
                .ok_or(CustomContractError::UnknownBidder)?;

            // Ensure that the bid reaches the current price plus the minimum
            // step. A bid large enough to wrap the bound or the deposit is
            // refused as well.
            let bound = self
                .viewable_state
                .current_price
                .checked_add(self.viewable_state.rule.minimum_step)
                .ok_or(CustomContractError::BidTooLow)?;
            ensure!(amount >= bound, CustomContractError::BidTooLow);

            entry.deposit = entry
                .deposit
                .checked_add(amount)
                .ok_or(CustomContractError::BidTooLow)?;
        }

        self.viewable_state.current_price = amount;
        self.viewable_state.current_winner = Some(bidder);

        Ok(())
    }

    /// Advance the announcement counter. Reaching [`ANNOUNCEMENT_LIMIT`]
    /// moves the auction to `Closing` and fixes the winner. The limit is a
    /// flat call count since the session start, placing a bid does not reset
    /// it.
    pub fn announce(&mut self, sender: &Address) -> ContractResult<AnnounceOutcome> {
        ensure!(
            sender.matches_account(&self.viewable_state.auctioneer),
            CustomContractError::Unauthorized
        );
        ensure!(
            self.viewable_state.auction_state == AuctionState::Started,
            CustomContractError::InvalidState
        );

        self.viewable_state.announcement_times += 1;

        if self.viewable_state.announcement_times == ANNOUNCEMENT_LIMIT {
            self.viewable_state.auction_state = AuctionState::Closing;
            Ok(AnnounceOutcome::Closed {
                winner: self.viewable_state.current_winner,
                price: self.viewable_state.current_price,
            })
        } else {
            Ok(AnnounceOutcome::Counting(
                self.viewable_state.announcement_times,
            ))
        }
    }

    /// Zero the caller's deposit after the close and return the amount that
    /// must be refunded. The winner is refused, their deposit is forfeit as
    /// the sale price. Zeroing an already empty deposit succeeds and refunds
    /// nothing.
    pub fn get_deposit(&mut self, bidder: &AccountAddress) -> ContractResult<TokenAmount> {
        ensure!(
            self.viewable_state.auction_state == AuctionState::Closing,
            CustomContractError::InvalidState
        );

        let mut entry = self
            .bidders
            .get_mut(bidder)
            .ok_or(CustomContractError::UnknownBidder)?;

        ensure!(
            self.viewable_state.current_winner.as_ref() != Some(bidder),
            CustomContractError::WinnerCannotWithdraw
        );

        let refund = entry.deposit;
        entry.deposit = 0;

        Ok(refund)
    }
}
