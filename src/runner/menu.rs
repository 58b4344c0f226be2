/// Menu input parsing
///
/// Everything here is pure: the interactive driver reads lines and passes
/// them in, so invalid input handling can be tested without a terminal.
use crate::scheduler::{compute_to_amount, format_amount, ActionKind, ActionRequest};
use crate::session::TokenDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Options 1-5: one action applied to every wallet
    Single(ActionKind),
    /// Option 6: full cycles on every wallet, repeated daily
    Daily,
    /// Option 7
    Exit,
}

pub const MENU_TEXT: &str = "1. Swap Token\n\
2. Supply Token\n\
3. Withdraw Token\n\
4. Borrow Token\n\
5. Repay Token\n\
6. Run All Features Daily\n\
7. Exit";

pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Single(ActionKind::Swap)),
        "2" => Some(MenuChoice::Single(ActionKind::Supply)),
        "3" => Some(MenuChoice::Single(ActionKind::Withdraw)),
        "4" => Some(MenuChoice::Single(ActionKind::Borrow)),
        "5" => Some(MenuChoice::Single(ActionKind::Repay)),
        "6" => Some(MenuChoice::Daily),
        "7" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Cycle count, at least 1
pub fn parse_cycle_count(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

/// Token by 1-based index into the catalog
pub fn select_token<'a>(tokens: &'a [TokenDescriptor], input: &str) -> Option<&'a TokenDescriptor> {
    let index = input.trim().parse::<usize>().ok()?;
    index.checked_sub(1).and_then(|i| tokens.get(i))
}

/// Numbered catalog listing, one token per line
pub fn token_listing(tokens: &[TokenDescriptor]) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t.symbol))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Positive finite amount
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
}

/// Resolve a single-mode swap once; identical tokens are rejected
pub fn build_swap_request(
    from: &TokenDescriptor,
    to: &TokenDescriptor,
    from_amount: f64,
) -> Result<ActionRequest, String> {
    if from.symbol == to.symbol {
        return Err("Cannot swap to the same token.".to_string());
    }
    let to_amount = compute_to_amount(from_amount, from.price, to.price);
    Ok(ActionRequest::Swap {
        from: from.symbol.clone(),
        to: to.symbol.clone(),
        from_amount: format_amount(from_amount),
        to_amount: format_amount(to_amount),
    })
}

/// Resolve a single-mode lending action once
pub fn build_lending_request(
    kind: ActionKind,
    token: &TokenDescriptor,
    amount: f64,
) -> Result<ActionRequest, String> {
    ActionRequest::lending(kind, &token.symbol, &format_amount(amount))
        .ok_or_else(|| format!("{} is not a lending action", kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(symbol: &str, price: f64) -> TokenDescriptor {
        TokenDescriptor {
            symbol: symbol.into(),
            price,
            kind: String::new(),
        }
    }

    #[test]
    fn test_menu_choices() {
        assert_eq!(
            parse_menu_choice("1"),
            Some(MenuChoice::Single(ActionKind::Swap))
        );
        assert_eq!(
            parse_menu_choice(" 5 \n"),
            Some(MenuChoice::Single(ActionKind::Repay))
        );
        assert_eq!(parse_menu_choice("6"), Some(MenuChoice::Daily));
        assert_eq!(parse_menu_choice("7"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu_choice("8"), None);
        assert_eq!(parse_menu_choice(""), None);
    }

    #[test]
    fn test_cycle_count_must_be_positive() {
        assert_eq!(parse_cycle_count("3"), Some(3));
        assert_eq!(parse_cycle_count("0"), None);
        assert_eq!(parse_cycle_count("-1"), None);
        assert_eq!(parse_cycle_count("two"), None);
    }

    #[test]
    fn test_select_token_is_one_based() {
        let tokens = vec![token("BSD", 1.0), token("ETH", 2.0)];
        assert_eq!(select_token(&tokens, "1").unwrap().symbol, "BSD");
        assert_eq!(select_token(&tokens, "2").unwrap().symbol, "ETH");
        assert!(select_token(&tokens, "0").is_none());
        assert!(select_token(&tokens, "3").is_none());
        assert!(select_token(&tokens, "x").is_none());
        assert_eq!(token_listing(&tokens), "1. BSD\n2. ETH");
    }

    #[test]
    fn test_same_token_swap_rejected() {
        let bsd = token("BSD", 1.0);
        assert!(build_swap_request(&bsd, &bsd, 1.0).is_err());
    }

    #[test]
    fn test_swap_request_is_priced() {
        let request = build_swap_request(&token("ETH", 2.0), &token("USDT", 4.0), 0.0012).unwrap();
        assert_eq!(
            request,
            ActionRequest::Swap {
                from: "ETH".into(),
                to: "USDT".into(),
                from_amount: "0.00120000".into(),
                to_amount: "0.00060000".into(),
            }
        );
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_amount("0.5"), Some(0.5));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        let request = build_lending_request(ActionKind::Supply, &token("BSD", 1.0), 1.0).unwrap();
        assert_eq!(request.to_string(), "Supply 1.00000000 BSD");
        assert!(build_lending_request(ActionKind::Swap, &token("BSD", 1.0), 1.0).is_err());
    }
}
