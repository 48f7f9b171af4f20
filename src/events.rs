use super::*;

pub const REGISTER_TAG: u8 = 0;
pub const SESSION_STARTED_TAG: u8 = 1;
pub const BID_TAG: u8 = 2;
pub const ANNOUNCE_TAG: u8 = 3;
pub const SOLD_TAG: u8 = 4;
pub const WITHDRAW_TAG: u8 = 5;

/// An untagged event of a bidder registration.
#[derive(Debug, Serialize, SchemaType)]
pub struct RegisterEvent {
    /// Registered account.
    pub bidder: AccountAddress,
    /// Token allotment of the bidder.
    pub token: TokenAmount,
}

/// An untagged event of an accepted bid.
#[derive(Debug, Serialize, SchemaType)]
pub struct BidEvent {
    /// Account that has bidden.
    pub bidder: AccountAddress,
    /// Accepted bid amount, the new current price.
    pub amount: TokenAmount,
}

/// An untagged event of an announcement before the close.
#[derive(Debug, Serialize, SchemaType)]
pub struct AnnounceEvent {
    /// Announcements made since the session start.
    pub times: u32,
}

/// An untagged event of the auction close.
#[derive(Debug, Serialize, SchemaType)]
pub struct SoldEvent {
    /// The final winner. `None` if no bid was placed.
    pub winner: Option<AccountAddress>,
    /// The final price.
    pub price: TokenAmount,
}

/// An untagged event of a deposit refund.
#[derive(Debug, Serialize, SchemaType)]
pub struct WithdrawEvent {
    /// Account whose deposit was zeroed.
    pub bidder: AccountAddress,
    /// Refunded amount.
    pub amount: TokenAmount,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvent {
    /// Bidder registration
    Register(RegisterEvent),
    /// Bidding session opened
    SessionStarted,
    /// Accepted bid
    Bid(BidEvent),
    /// Announcement towards the close
    Announce(AnnounceEvent),
    /// Auction closed
    Sold(SoldEvent),
    /// Deposit refund
    Withdraw(WithdrawEvent),
}

impl Serial for AuctionEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvent::Register(event) => {
                out.write_u8(REGISTER_TAG)?;
                event.serial(out)
            }
            AuctionEvent::SessionStarted => out.write_u8(SESSION_STARTED_TAG),
            AuctionEvent::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Announce(event) => {
                out.write_u8(ANNOUNCE_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Sold(event) => {
                out.write_u8(SOLD_TAG)?;
                event.serial(out)
            }
            AuctionEvent::Withdraw(event) => {
                out.write_u8(WITHDRAW_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for AuctionEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            REGISTER_TAG => RegisterEvent::deserial(source).map(AuctionEvent::Register),
            SESSION_STARTED_TAG => Ok(AuctionEvent::SessionStarted),
            BID_TAG => BidEvent::deserial(source).map(AuctionEvent::Bid),
            ANNOUNCE_TAG => AnnounceEvent::deserial(source).map(AuctionEvent::Announce),
            SOLD_TAG => SoldEvent::deserial(source).map(AuctionEvent::Sold),
            WITHDRAW_TAG => WithdrawEvent::deserial(source).map(AuctionEvent::Withdraw),
            _ => Err(ParseError::default()),
        }
    }
}
