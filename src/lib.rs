//! # Implementation of an English auction smart contract
//!
//! A single-round ascending-price auction run by one trusted auctioneer.
//! The account that initializes the contract becomes the auctioneer and is
//! the only one allowed to register bidders, open the bidding session and
//! announce towards the close.
//!
//! Every registered bidder holds a pre-allocated token balance. Placing a
//! bid escrows the full bid amount as a deposit on top of any earlier
//! deposits, i.e. a bidder that bids twice has the **sum** of both bids
//! held by the contract. A bid is only accepted while the session is open
//! and if it reaches the current price plus the minimum step.
//!
//! The auctioneer closes the auction by announcing: the fourth announcement
//! since the session started moves the auction to its terminal closing
//! phase and fixes the winner. After that, every bidder except the winner
//! can reclaim their full deposit; the winner's deposit is forfeit as the
//! sale price.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{errors::*, events::*, external::*, state::*};
use concordium_std::*;
use core::fmt::Debug;

mod contract;
mod errors;
mod events;
mod external;
mod state;
