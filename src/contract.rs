use super::*;

/// Init function that creates a new auction with the given pricing rule.
/// The account creating the instance becomes the auctioneer.
#[init(contract = "Auction", parameter = "InitParameter")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParameter = ctx.parameter_cursor().get()?;

    ensure!(
        params.minimum_step > 0,
        CustomContractError::ZeroMinimumStep.into()
    );

    Ok(State::new(
        state_builder,
        Rule {
            starting_price: params.starting_price,
            minimum_step: params.minimum_step,
        },
        ctx.init_origin(),
    ))
}

/// Receive function with which the auctioneer registers a bidder together
/// with their token allotment before the session starts. Registering an
/// already known account overwrites its record.
#[receive(
    mutable,
    contract = "Auction",
    name = "register",
    parameter = "RegisterParams",
    enable_logger
)]
fn contract_register<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = RegisterParams::deserial(&mut ctx.parameter_cursor())?;

    host.state_mut()
        .register(&ctx.sender(), params.bidder, params.token)?;

    logger.log(&AuctionEvent::Register(RegisterEvent {
        bidder: params.bidder,
        token: params.token,
    }))?;

    Ok(())
}

/// Receive function with which the auctioneer opens the bidding session.
#[receive(
    mutable,
    contract = "Auction",
    name = "startSession",
    enable_logger
)]
fn contract_start_session<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    host.state_mut().start_session(&ctx.sender())?;

    logger.log(&AuctionEvent::SessionStarted)?;

    Ok(())
}

/// Receive function with which registered bidders place bids while the
/// session is open. The full bid amount is escrowed on top of the bidder's
/// earlier deposits and becomes the new current price.
#[receive(
    mutable,
    contract = "Auction",
    name = "bid",
    parameter = "BidParams",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = BidParams::deserial(&mut ctx.parameter_cursor())?;

    let bidder = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
        Address::Account(account_address) => account_address,
    };

    host.state_mut().bid(bidder, params.amount)?;

    logger.log(&AuctionEvent::Bid(BidEvent {
        bidder,
        amount: params.amount,
    }))?;

    Ok(())
}

/// Receive function with which the auctioneer announces towards the close.
/// The fourth announcement since the session start closes the auction and
/// fixes the winner.
#[receive(
    mutable,
    contract = "Auction",
    name = "announce",
    enable_logger
)]
fn contract_announce<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    match host.state_mut().announce(&ctx.sender())? {
        AnnounceOutcome::Counting(times) => {
            logger.log(&AuctionEvent::Announce(AnnounceEvent { times }))?;
        }
        AnnounceOutcome::Closed { winner, price } => {
            logger.log(&AuctionEvent::Sold(SoldEvent { winner, price }))?;
        }
    }

    Ok(())
}

/// Receive function with which a non-winning bidder reclaims their deposit
/// after the close. The contract only zeroes the ledger entry, paying the
/// refund out is the concern of the surrounding infrastructure.
#[receive(
    mutable,
    contract = "Auction",
    name = "getDeposit",
    enable_logger
)]
fn contract_get_deposit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
        Address::Account(account_address) => account_address,
    };

    let amount = host.state_mut().get_deposit(&bidder)?;

    logger.log(&AuctionEvent::Withdraw(WithdrawEvent { bidder, amount }))?;

    Ok(())
}

/// View function that returns the contents of the state except the map of
/// individual bidders.
#[receive(contract = "Auction", name = "view", return_value = "ViewableState")]
fn contract_view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ViewableState> {
    Ok(host.state().viewable_state.clone())
}

/// View function that returns the record of a single registered bidder.
#[receive(
    contract = "Auction",
    name = "viewBidder",
    parameter = "AccountAddress",
    return_value = "Bidder"
)]
fn contract_view_bidder<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Bidder> {
    let account = AccountAddress::deserial(&mut ctx.parameter_cursor())?;

    let bidder = *host
        .state()
        .bidders
        .get(&account)
        .ok_or(CustomContractError::UnknownBidder)?;

    Ok(bidder)
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const AUCTIONEER: AccountAddress = AccountAddress([0u8; 32]);
    const ALICE: AccountAddress = AccountAddress([1u8; 32]);
    const BOB: AccountAddress = AccountAddress([2u8; 32]);
    const CAROL: AccountAddress = AccountAddress([3u8; 32]);
    const DAVE: AccountAddress = AccountAddress([4u8; 32]);
    const EVE: AccountAddress = AccountAddress([5u8; 32]);

    const STARTING_PRICE: TokenAmount = 50;
    const MINIMUM_STEP: TokenAmount = 5;

    fn expect_error<E, T>(expr: Result<T, E>, err: E, msg: &str)
    where
        E: Eq + Debug,
        T: Debug,
    {
        let actual = expr.expect_err(msg);
        assert_eq!(actual, err);
    }

    fn init_parameter() -> InitParameter {
        InitParameter {
            starting_price: STARTING_PRICE,
            minimum_step: MINIMUM_STEP,
        }
    }

    fn parametrized_init_ctx<'a>(parameter_bytes: &'a [u8]) -> TestInitContext<'a> {
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(AUCTIONEER);
        ctx.set_parameter(parameter_bytes);
        ctx
    }

    fn new_ctx<'a>(sender: AccountAddress) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender));
        ctx
    }

    /// Initialize a fresh auction with the default rule (50, 5).
    fn fresh_host() -> TestHost<State<TestStateApi>> {
        let parameter_bytes = to_bytes(&init_parameter());
        let ctx = parametrized_init_ctx(&parameter_bytes);
        let mut state_builder = TestStateBuilder::new();
        let state = contract_init(&ctx, &mut state_builder).expect("Initialization should pass");
        TestHost::new(state, state_builder)
    }

    fn register_bidder(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        bidder: AccountAddress,
        token: TokenAmount,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&RegisterParams { bidder, token });
        let mut ctx = new_ctx(sender);
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();
        contract_register(&ctx, host, &mut logger)
    }

    fn open_session(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
    ) -> ContractResult<()> {
        let ctx = new_ctx(sender);
        let mut logger = TestLogger::init();
        contract_start_session(&ctx, host, &mut logger)
    }

    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        amount: TokenAmount,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&BidParams { amount });
        let mut ctx = new_ctx(sender);
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();
        contract_bid(&ctx, host, &mut logger)
    }

    fn make_announcement(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
    ) -> ContractResult<()> {
        let ctx = new_ctx(sender);
        let mut logger = TestLogger::init();
        contract_announce(&ctx, host, &mut logger)
    }

    fn withdraw_deposit(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
    ) -> ContractResult<()> {
        let ctx = new_ctx(sender);
        let mut logger = TestLogger::init();
        contract_get_deposit(&ctx, host, &mut logger)
    }

    /// Register the four default bidders with tokens 200, 150, 180 and 250.
    fn register_default_bidders(host: &mut TestHost<State<TestStateApi>>) {
        for (bidder, token) in [(ALICE, 200), (BOB, 150), (CAROL, 180), (DAVE, 250)].iter() {
            register_bidder(host, AUCTIONEER, *bidder, *token)
                .expect("Registering a bidder should pass");
        }
    }

    /// Auction with the default bidders and an open session.
    fn host_in_session() -> TestHost<State<TestStateApi>> {
        let mut host = fresh_host();
        register_default_bidders(&mut host);
        open_session(&mut host, AUCTIONEER).expect("Starting the session should pass");
        host
    }

    fn deposit_of(host: &TestHost<State<TestStateApi>>, bidder: AccountAddress) -> TokenAmount {
        host.state()
            .bidders
            .get(&bidder)
            .expect("Bidder should be registered")
            .deposit
    }

    #[concordium_test]
    /// Test that initialization sets the rule, the starting price, an empty
    /// announcement counter and no winner.
    fn test_init() {
        let host = fresh_host();
        let state = &host.state().viewable_state;

        claim_eq!(
            state.auction_state,
            AuctionState::Created,
            "Auction state should be Created after initialization"
        );
        claim_eq!(state.rule.starting_price, STARTING_PRICE, "Starting price should be 50");
        claim_eq!(state.rule.minimum_step, MINIMUM_STEP, "Minimum step should be 5");
        claim_eq!(
            state.current_price, STARTING_PRICE,
            "Current price should start at the starting price"
        );
        claim_eq!(state.current_winner, None, "There should be no winner yet");
        claim_eq!(state.announcement_times, 0, "No announcements yet");
        claim_eq!(state.auctioneer, AUCTIONEER, "Init origin should be the auctioneer");
    }

    #[concordium_test]
    /// A rule with a zero minimum step is rejected on initialization.
    fn test_init_zero_minimum_step() {
        let parameter_bytes = to_bytes(&InitParameter {
            starting_price: STARTING_PRICE,
            minimum_step: 0,
        });
        let ctx = parametrized_init_ctx(&parameter_bytes);
        let mut state_builder = TestStateBuilder::new();

        let result = contract_init(&ctx, &mut state_builder);
        claim!(result.is_err(), "A zero minimum step should be rejected");
    }

    #[concordium_test]
    /// The auctioneer can register bidders and their token allotments are
    /// stored exactly, with empty deposits.
    fn test_register() {
        let mut host = fresh_host();
        register_default_bidders(&mut host);

        for (bidder, token) in [(ALICE, 200), (BOB, 150), (CAROL, 180), (DAVE, 250)].iter() {
            let record = *host
                .state()
                .bidders
                .get(bidder)
                .expect("Registered bidder should be present");
            claim_eq!(record.token, *token, "Stored allotment should match the registered one");
            claim_eq!(record.deposit, 0, "A fresh bidder should have no deposit");
        }
    }

    #[concordium_test]
    /// Registering the same account again overwrites its record.
    fn test_register_overwrites() {
        let mut host = fresh_host();

        register_bidder(&mut host, AUCTIONEER, ALICE, 200).expect("Registering should pass");
        register_bidder(&mut host, AUCTIONEER, ALICE, 120).expect("Re-registering should pass");

        let record = *host.state().bidders.get(&ALICE).expect("Bidder should be present");
        claim_eq!(record.token, 120, "Re-registration should overwrite the allotment");
    }

    #[concordium_test]
    /// Only the auctioneer can register bidders; a failed registration
    /// leaves the bidder map unchanged.
    fn test_register_not_auctioneer() {
        let mut host = fresh_host();

        let result = register_bidder(&mut host, ALICE, EVE, 100);
        expect_error(
            result,
            CustomContractError::Unauthorized,
            "Registration by a non-auctioneer should fail",
        );
        claim!(
            host.state().bidders.get(&EVE).is_none(),
            "A failed registration should not touch the bidder map"
        );
    }

    #[concordium_test]
    /// Registration is only possible before the session starts.
    fn test_register_after_start() {
        let mut host = fresh_host();
        register_default_bidders(&mut host);
        open_session(&mut host, AUCTIONEER).expect("Starting the session should pass");

        let result = register_bidder(&mut host, AUCTIONEER, EVE, 100);
        expect_error(
            result,
            CustomContractError::InvalidState,
            "Registration after the session start should fail",
        );
        claim!(
            host.state().bidders.get(&EVE).is_none(),
            "A failed registration should not touch the bidder map"
        );
    }

    #[concordium_test]
    /// A register call without the token allotment in its parameter is
    /// rejected as a parse error before any state mutation.
    fn test_register_malformed_parameter() {
        let mut host = fresh_host();

        // Only the account address, the token count is missing
        let parameter_bytes = to_bytes(&ALICE);
        let mut ctx = new_ctx(AUCTIONEER);
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();

        let result = contract_register(&ctx, &mut host, &mut logger);
        expect_error(
            result,
            CustomContractError::ParseParams,
            "A truncated register parameter should fail parsing",
        );
        claim!(
            host.state().bidders.get(&ALICE).is_none(),
            "A failed registration should not touch the bidder map"
        );
    }

    #[concordium_test]
    /// The session can be started exactly once, and only by the auctioneer.
    fn test_start_session() {
        let mut host = fresh_host();
        register_default_bidders(&mut host);

        expect_error(
            open_session(&mut host, ALICE),
            CustomContractError::Unauthorized,
            "Starting the session by a non-auctioneer should fail",
        );
        claim_eq!(
            host.state().viewable_state.auction_state,
            AuctionState::Created,
            "A failed start should leave the state in Created"
        );

        open_session(&mut host, AUCTIONEER).expect("Starting the session should pass");
        claim_eq!(
            host.state().viewable_state.auction_state,
            AuctionState::Started,
            "Starting the session should move the state to Started"
        );

        expect_error(
            open_session(&mut host, AUCTIONEER),
            CustomContractError::InvalidState,
            "Starting the session twice should fail",
        );
        claim_eq!(
            host.state().viewable_state.auction_state,
            AuctionState::Started,
            "A repeated start should not re-execute the transition"
        );
    }

    #[concordium_test]
    /// An ascending sequence of bids moves the current price and the winner;
    /// a bid below the current price plus the step is rejected and changes
    /// nothing.
    fn test_bid_sequence() {
        let mut host = host_in_session();

        place_bid(&mut host, ALICE, 56).expect("Bidding 56 should pass");
        place_bid(&mut host, BOB, 65).expect("Bidding 65 should pass");
        place_bid(&mut host, CAROL, 75).expect("Bidding 75 should pass");
        place_bid(&mut host, DAVE, 80).expect("Bidding 80 should pass");

        let state = &host.state().viewable_state;
        claim_eq!(state.current_price, 80, "Current price should be the last accepted bid");
        claim_eq!(state.current_winner, Some(DAVE), "The last accepted bidder should lead");

        // 83 < 80 + 5
        expect_error(
            place_bid(&mut host, BOB, 83),
            CustomContractError::BidTooLow,
            "A bid below the current price plus the step should fail",
        );

        let state = &host.state().viewable_state;
        claim_eq!(state.current_price, 80, "A rejected bid should not move the price");
        claim_eq!(state.current_winner, Some(DAVE), "A rejected bid should not move the winner");
        claim_eq!(deposit_of(&host, BOB), 65, "A rejected bid should not touch the deposit");
    }

    #[concordium_test]
    /// The first acceptable bid is the starting price plus the minimum step.
    fn test_bid_minimum_increment() {
        let mut host = host_in_session();

        expect_error(
            place_bid(&mut host, ALICE, 54),
            CustomContractError::BidTooLow,
            "A bid below the starting price plus the step should fail",
        );

        place_bid(&mut host, ALICE, 55).expect("Bidding exactly price plus step should pass");
        claim_eq!(host.state().viewable_state.current_price, 55, "Price should be 55");
    }

    #[concordium_test]
    /// A bidder may outbid themselves; each accepted bid is escrowed on top
    /// of the earlier ones and nothing is refunded at bid time.
    fn test_bid_deposits_accumulate() {
        let mut host = host_in_session();

        place_bid(&mut host, ALICE, 56).expect("Bidding 56 should pass");
        place_bid(&mut host, ALICE, 65).expect("Outbidding oneself should pass");
        place_bid(&mut host, BOB, 70).expect("Bidding 70 should pass");

        claim_eq!(
            deposit_of(&host, ALICE),
            56 + 65,
            "Deposits of a repeated bidder should accumulate"
        );
        claim_eq!(deposit_of(&host, BOB), 70, "Deposit should equal the single bid");
        claim_eq!(host.state().viewable_state.current_winner, Some(BOB), "Bob should lead");
    }

    #[concordium_test]
    /// Bids are refused before the session starts and from accounts that
    /// were never registered.
    fn test_bid_preconditions() {
        let mut host = fresh_host();
        register_default_bidders(&mut host);

        expect_error(
            place_bid(&mut host, ALICE, 56),
            CustomContractError::InvalidState,
            "Bidding before the session start should fail",
        );

        open_session(&mut host, AUCTIONEER).expect("Starting the session should pass");

        expect_error(
            place_bid(&mut host, EVE, 56),
            CustomContractError::UnknownBidder,
            "Bidding by an unregistered account should fail",
        );
    }

    #[concordium_test]
    /// A bid with a malformed parameter fails parsing, distinctly from the
    /// price check.
    fn test_bid_malformed_parameter() {
        let mut host = host_in_session();

        let parameter_bytes = to_bytes(&1u8);
        let mut ctx = new_ctx(ALICE);
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();

        let result = contract_bid(&ctx, &mut host, &mut logger);
        expect_error(
            result,
            CustomContractError::ParseParams,
            "A truncated bid parameter should fail parsing",
        );
        claim_eq!(
            host.state().viewable_state.current_price,
            STARTING_PRICE,
            "A failed bid should not move the price"
        );
    }

    #[concordium_test]
    /// Contract addresses cannot act as bidders.
    fn test_bid_contract_sender() {
        let mut host = host_in_session();

        let parameter_bytes = to_bytes(&BidParams { amount: 60 });
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(ContractAddress {
            index: 1,
            subindex: 0,
        }));
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();

        let result = contract_bid(&ctx, &mut host, &mut logger);
        expect_error(
            result,
            CustomContractError::OnlyAccountAddress,
            "Bidding from a contract address should fail",
        );
    }

    #[concordium_test]
    /// The first three announcements only advance the counter; exactly the
    /// fourth one closes the auction, after which announcing and bidding are
    /// refused.
    fn test_announce_closes_on_fourth_call() {
        let mut host = host_in_session();
        place_bid(&mut host, DAVE, 80).expect("Bidding 80 should pass");

        for times in 1..=3u32 {
            make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");
            let state = &host.state().viewable_state;
            claim_eq!(state.announcement_times, times, "Counter should advance by one");
            claim_eq!(
                state.auction_state,
                AuctionState::Started,
                "The first three announcements should not close the auction"
            );
        }

        make_announcement(&mut host, AUCTIONEER).expect("The fourth announcement should pass");
        let state = &host.state().viewable_state;
        claim_eq!(state.announcement_times, 4, "Counter should be 4 at the close");
        claim_eq!(
            state.auction_state,
            AuctionState::Closing,
            "The fourth announcement should close the auction"
        );
        claim_eq!(state.current_winner, Some(DAVE), "The winner should be final");

        expect_error(
            make_announcement(&mut host, AUCTIONEER),
            CustomContractError::InvalidState,
            "Announcing after the close should fail",
        );
        expect_error(
            place_bid(&mut host, ALICE, 100),
            CustomContractError::InvalidState,
            "Bidding after the close should fail",
        );
    }

    #[concordium_test]
    /// A new bid does not reset the announcement countdown; the limit is a
    /// flat call count since the session start.
    fn test_announce_not_reset_by_bid() {
        let mut host = host_in_session();

        make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");
        make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");
        make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");

        place_bid(&mut host, ALICE, 56).expect("Bidding 56 should pass");
        claim_eq!(
            host.state().viewable_state.announcement_times,
            3,
            "A bid should not touch the announcement counter"
        );

        make_announcement(&mut host, AUCTIONEER).expect("The fourth announcement should pass");
        claim_eq!(
            host.state().viewable_state.auction_state,
            AuctionState::Closing,
            "The fourth announcement should close the auction regardless of bids"
        );
        claim_eq!(
            host.state().viewable_state.current_winner,
            Some(ALICE),
            "The last accepted bidder should win"
        );
    }

    #[concordium_test]
    /// Announcing is auctioneer-only and refused outside the open session.
    fn test_announce_preconditions() {
        let mut host = fresh_host();
        register_default_bidders(&mut host);

        expect_error(
            make_announcement(&mut host, AUCTIONEER),
            CustomContractError::InvalidState,
            "Announcing before the session start should fail",
        );

        open_session(&mut host, AUCTIONEER).expect("Starting the session should pass");

        expect_error(
            make_announcement(&mut host, ALICE),
            CustomContractError::Unauthorized,
            "Announcing by a non-auctioneer should fail",
        );
        claim_eq!(
            host.state().viewable_state.announcement_times,
            0,
            "A failed announcement should not advance the counter"
        );
    }

    #[concordium_test]
    /// After the close every non-winner reclaims their full deposit, the
    /// winner is refused and keeps their ledger entry untouched, and a
    /// repeated withdrawal zeroes an already empty deposit.
    fn test_get_deposit() {
        let mut host = host_in_session();

        place_bid(&mut host, ALICE, 56).expect("Bidding 56 should pass");
        place_bid(&mut host, BOB, 65).expect("Bidding 65 should pass");
        place_bid(&mut host, CAROL, 75).expect("Bidding 75 should pass");
        place_bid(&mut host, DAVE, 80).expect("Bidding 80 should pass");

        for _ in 0..4 {
            make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");
        }

        withdraw_deposit(&mut host, ALICE).expect("A non-winner withdrawal should pass");
        claim_eq!(deposit_of(&host, ALICE), 0, "Withdrawal should zero the deposit");

        expect_error(
            withdraw_deposit(&mut host, DAVE),
            CustomContractError::WinnerCannotWithdraw,
            "The winner's withdrawal should fail",
        );
        claim_eq!(
            deposit_of(&host, DAVE),
            80,
            "The winner's deposit should stay untouched"
        );

        withdraw_deposit(&mut host, ALICE).expect("A repeated withdrawal should pass");
        claim_eq!(deposit_of(&host, ALICE), 0, "The deposit should stay zero");

        expect_error(
            withdraw_deposit(&mut host, EVE),
            CustomContractError::UnknownBidder,
            "Withdrawal by an unregistered account should fail",
        );

        withdraw_deposit(&mut host, BOB).expect("A non-winner withdrawal should pass");
        withdraw_deposit(&mut host, CAROL).expect("A non-winner withdrawal should pass");
        claim_eq!(deposit_of(&host, BOB), 0, "Withdrawal should zero the deposit");
        claim_eq!(deposit_of(&host, CAROL), 0, "Withdrawal should zero the deposit");
    }

    #[concordium_test]
    /// Withdrawals are refused in every phase before the close.
    fn test_get_deposit_before_close() {
        let mut host = fresh_host();
        register_default_bidders(&mut host);

        expect_error(
            withdraw_deposit(&mut host, ALICE),
            CustomContractError::InvalidState,
            "Withdrawal before the session start should fail",
        );

        open_session(&mut host, AUCTIONEER).expect("Starting the session should pass");
        place_bid(&mut host, ALICE, 56).expect("Bidding 56 should pass");

        expect_error(
            withdraw_deposit(&mut host, ALICE),
            CustomContractError::InvalidState,
            "Withdrawal while the session is open should fail",
        );
        claim_eq!(deposit_of(&host, ALICE), 56, "The deposit should stay escrowed");
    }

    #[concordium_test]
    /// An auction can close without a single bid; there is no winner and
    /// every bidder can reclaim their (empty) deposit.
    fn test_close_without_bids() {
        let mut host = host_in_session();

        for _ in 0..4 {
            make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");
        }

        let state = &host.state().viewable_state;
        claim_eq!(state.auction_state, AuctionState::Closing, "The auction should be closed");
        claim_eq!(state.current_winner, None, "There should be no winner");
        claim_eq!(
            state.current_price, STARTING_PRICE,
            "The price should still be the starting price"
        );

        withdraw_deposit(&mut host, ALICE).expect("Withdrawal without bids should pass");
        claim_eq!(deposit_of(&host, ALICE), 0, "The deposit should stay zero");
    }

    #[concordium_test]
    /// Bids that would wrap the price bound or a bidder's deposit are
    /// rejected and leave the ledger untouched.
    fn test_bid_overflow_guard() {
        let mut host = host_in_session();

        place_bid(&mut host, ALICE, 56).expect("Bidding 56 should pass");

        expect_error(
            place_bid(&mut host, ALICE, u64::MAX),
            CustomContractError::BidTooLow,
            "A bid that would wrap the bidder's deposit should fail",
        );
        claim_eq!(deposit_of(&host, ALICE), 56, "A rejected bid should not touch the deposit");
        claim_eq!(
            host.state().viewable_state.current_price,
            56,
            "A rejected bid should not move the price"
        );
        claim_eq!(
            host.state().viewable_state.current_winner,
            Some(ALICE),
            "A rejected bid should not move the winner"
        );

        // A fresh bidder can still take the price to the maximum
        place_bid(&mut host, BOB, u64::MAX).expect("Bidding the maximum should pass");
        claim_eq!(
            host.state().viewable_state.current_price,
            u64::MAX,
            "Price should be the accepted bid"
        );

        // No bid can reach past the maximum price plus the step
        expect_error(
            place_bid(&mut host, CAROL, u64::MAX),
            CustomContractError::BidTooLow,
            "A bid against a wrapped price bound should fail",
        );
        claim_eq!(
            host.state().viewable_state.current_winner,
            Some(BOB),
            "A rejected bid should not move the winner"
        );
    }

    #[concordium_test]
    /// Every successful mutation logs exactly one event with the expected
    /// tag and payload, and the closing announcement logs the sale instead
    /// of the counter.
    fn test_event_log() {
        let mut host = fresh_host();

        let parameter_bytes = to_bytes(&RegisterParams {
            bidder: ALICE,
            token: 200,
        });
        let mut ctx = new_ctx(AUCTIONEER);
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();
        contract_register(&ctx, &mut host, &mut logger).expect("Registering should pass");
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::Register(RegisterEvent {
                bidder: ALICE,
                token: 200,
            })),
            "Incorrect event emitted"
        );

        register_bidder(&mut host, AUCTIONEER, BOB, 150).expect("Registering should pass");

        let ctx = new_ctx(AUCTIONEER);
        let mut logger = TestLogger::init();
        contract_start_session(&ctx, &mut host, &mut logger)
            .expect("Starting the session should pass");
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::SessionStarted),
            "Incorrect event emitted"
        );

        let parameter_bytes = to_bytes(&BidParams { amount: 56 });
        let mut ctx = new_ctx(ALICE);
        ctx.set_parameter(&parameter_bytes);
        let mut logger = TestLogger::init();
        contract_bid(&ctx, &mut host, &mut logger).expect("Bidding 56 should pass");
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::Bid(BidEvent {
                bidder: ALICE,
                amount: 56,
            })),
            "Incorrect event emitted"
        );

        place_bid(&mut host, BOB, 65).expect("Bidding 65 should pass");

        // A non-closing announcement logs the advanced counter
        let ctx = new_ctx(AUCTIONEER);
        let mut logger = TestLogger::init();
        contract_announce(&ctx, &mut host, &mut logger).expect("Announcing should pass");
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::Announce(AnnounceEvent { times: 1 })),
            "Incorrect event emitted"
        );

        make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");
        make_announcement(&mut host, AUCTIONEER).expect("Announcing should pass");

        // The closing announcement logs the sale
        let ctx = new_ctx(AUCTIONEER);
        let mut logger = TestLogger::init();
        contract_announce(&ctx, &mut host, &mut logger)
            .expect("The fourth announcement should pass");
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::Sold(SoldEvent {
                winner: Some(BOB),
                price: 65,
            })),
            "Incorrect event emitted"
        );

        let ctx = new_ctx(ALICE);
        let mut logger = TestLogger::init();
        contract_get_deposit(&ctx, &mut host, &mut logger)
            .expect("A non-winner withdrawal should pass");
        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&AuctionEvent::Withdraw(WithdrawEvent {
                bidder: ALICE,
                amount: 56,
            })),
            "Incorrect event emitted"
        );
    }

    #[concordium_test]
    /// The view functions expose the committed scalar state and single
    /// bidder records.
    fn test_view() {
        let mut host = host_in_session();
        place_bid(&mut host, BOB, 60).expect("Bidding 60 should pass");

        let ctx = TestReceiveContext::empty();
        let view = contract_view(&ctx, &host).expect("Viewing should pass");
        claim_eq!(view.auction_state, AuctionState::Started, "State should be Started");
        claim_eq!(view.current_price, 60, "Price should be the accepted bid");
        claim_eq!(view.current_winner, Some(BOB), "Bob should lead");
        claim_eq!(view.auctioneer, AUCTIONEER, "The auctioneer should be exposed");

        let parameter_bytes = to_bytes(&BOB);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&parameter_bytes);
        let record = contract_view_bidder(&ctx, &host).expect("Viewing a bidder should pass");
        claim_eq!(record.token, 150, "The allotment should match the registration");
        claim_eq!(record.deposit, 60, "The deposit should match the escrowed bid");

        let parameter_bytes = to_bytes(&EVE);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&parameter_bytes);
        let result = contract_view_bidder(&ctx, &host);
        expect_error(
            result,
            CustomContractError::UnknownBidder,
            "Viewing an unregistered account should fail",
        );
    }
}
