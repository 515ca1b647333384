//! Schedule text decoder.
//!
//! A schedule is a whitespace-separated list of `<Action><TransactionId>(<Resource>)` tokens,
//! for example `R1(X) W2(Y)`. Malformed text is rejected here so the simulator only ever sees
//! well-formed operations.

use twopl_common::error::{TplError, TplResult};
use twopl_common::ids::TxnId;
use twopl_transaction::operation::{Action, Operation};

/// Decodes every token of `schedule` in order.
///
/// # Errors
///
/// Returns `TplError::Parse` naming the first malformed token and its 1-based position.
pub fn parse_schedule(schedule: &str) -> TplResult<Vec<Operation>> {
    schedule
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| parse_token(index + 1, token))
        .collect()
}

/// Decodes a single token such as `W12(acct)`.
///
/// # Errors
///
/// Returns `TplError::Parse` when the token is malformed.
pub fn parse_operation(token: &str) -> TplResult<Operation> {
    parse_token(1, token.trim())
}

fn parse_token(position: usize, token: &str) -> TplResult<Operation> {
    let reject = |reason: &'static str| TplError::Parse {
        position,
        token: token.to_owned(),
        reason,
    };

    let Some(letter) = token.chars().next() else {
        return Err(reject("empty token"));
    };
    let Some(action) = Action::from_letter(letter) else {
        return Err(reject("unknown action"));
    };
    let rest = &token[letter.len_utf8()..];

    let Some(open) = rest.find('(') else {
        return Err(reject("unmatched parenthesis"));
    };
    let digits = &rest[..open];
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(reject("invalid transaction id"));
    }
    let txid = digits
        .parse::<TxnId>()
        .map_err(|_| reject("invalid transaction id"))?;

    let Some(resource) = rest[open + 1..].strip_suffix(')') else {
        return Err(reject("unmatched parenthesis"));
    };
    if resource.contains(['(', ')']) {
        return Err(reject("unmatched parenthesis"));
    }
    if resource.is_empty() {
        return Err(reject("empty resource"));
    }

    Ok(Operation::new(action, txid, resource))
}
