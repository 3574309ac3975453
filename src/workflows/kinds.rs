//! Concrete request/reply workflow kinds
//!
//! A kind names the entity a workflow drives and the outbound verb that
//! starts it. Everything else (states, correlation, persistence) is shared.

use crate::client::{ClientResult, SwitchClient};
use futures::future::BoxFuture;
use serde_json::Value;

/// Outbound request future returned by [`ActionKind::send`]
pub type SendFuture<'a> = BoxFuture<'a, ClientResult<()>>;

pub trait ActionKind: Send + Sync + 'static {
    /// Channel prefix, `"<ENTITY>-<id>"`
    const ENTITY: &'static str;

    /// Identifier argument, e.g. `transferId`
    const ID_FIELD: &'static str;

    /// Argument carrying the outbound request body, e.g. `transfer`
    const PAYLOAD_FIELD: &'static str;

    /// Workflow name used in log messages
    const NAME: &'static str;

    /// Data key the parsed reply is stored under
    const REPLY_KEY: &'static str;

    /// Issue the outbound request for `payload` to `destination`
    fn send<'a>(
        client: &'a dyn SwitchClient,
        payload: &'a Value,
        destination: Option<&'a str>,
    ) -> SendFuture<'a>;
}

/// Transfer execution: `POST /transfers`
#[derive(Debug, Clone, Copy)]
pub struct TransferAction;

impl ActionKind for TransferAction {
    const ENTITY: &'static str = "transfers";
    const ID_FIELD: &'static str = "transferId";
    const PAYLOAD_FIELD: &'static str = "transfer";
    const NAME: &'static str = "TransfersModel";
    const REPLY_KEY: &'static str = "transfers";

    fn send<'a>(
        client: &'a dyn SwitchClient,
        payload: &'a Value,
        destination: Option<&'a str>,
    ) -> SendFuture<'a> {
        client.post_transfers(payload, destination)
    }
}

/// Quotation: `POST /quotes`
#[derive(Debug, Clone, Copy)]
pub struct QuoteAction;

impl ActionKind for QuoteAction {
    const ENTITY: &'static str = "quotes";
    const ID_FIELD: &'static str = "quoteId";
    const PAYLOAD_FIELD: &'static str = "quote";
    const NAME: &'static str = "QuotesModel";
    const REPLY_KEY: &'static str = "quotes";

    fn send<'a>(
        client: &'a dyn SwitchClient,
        payload: &'a Value,
        destination: Option<&'a str>,
    ) -> SendFuture<'a> {
        client.post_quotes(payload, destination)
    }
}

/// Party discovery: `GET /parties`
#[derive(Debug, Clone, Copy)]
pub struct PartyLookupAction;

impl ActionKind for PartyLookupAction {
    const ENTITY: &'static str = "parties";
    const ID_FIELD: &'static str = "partyId";
    const PAYLOAD_FIELD: &'static str = "party";
    const NAME: &'static str = "PartiesModel";
    const REPLY_KEY: &'static str = "parties";

    fn send<'a>(
        client: &'a dyn SwitchClient,
        payload: &'a Value,
        destination: Option<&'a str>,
    ) -> SendFuture<'a> {
        client.get_parties(payload, destination)
    }
}
