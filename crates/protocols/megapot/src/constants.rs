/// `ticketsPurchasedTotalBps` is in hundredths of a percent of a ticket
pub const BPS_PER_TICKET: u64 = 10_000;

/// Upper bound on a single purchase, matching the contract's own limit
pub const MAX_TICKETS_PER_PURCHASE: u64 = 1_000;

/// Longest subscription the contract accepts
pub const MAX_SUBSCRIPTION_DAYS: u64 = 365;
