//! Risk Factor Analyzers
//!
//! Seven independent checks over `OrderFacts`. Each returns its own
//! `RiskFactorResult`; none reads another's output.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::logic::client::is_public_ip;
use super::facts::OrderFacts;
use super::rules::*;
use super::types::RiskFactorResult;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("[0-9]{{{},}}", EMAIL_DIGIT_RUN)).expect("valid digit run regex")
});

/// Analyzer category, used as the `details` key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    SecurityFee,
    Email,
    Geography,
    OrderValue,
    Customer,
    Technical,
    Behavioral,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::SecurityFee,
        Category::Email,
        Category::Geography,
        Category::OrderValue,
        Category::Customer,
        Category::Technical,
        Category::Behavioral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SecurityFee => "security_fee",
            Category::Email => "email",
            Category::Geography => "geography",
            Category::OrderValue => "order_value",
            Category::Customer => "customer",
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
        }
    }

    pub fn analyze(&self, facts: &OrderFacts, rules: &ScoringRules) -> RiskFactorResult {
        match self {
            Category::SecurityFee => analyze_security_fee(facts),
            Category::Email => analyze_email(facts, rules),
            Category::Geography => analyze_geography(facts, rules),
            Category::OrderValue => analyze_order_value(facts),
            Category::Customer => analyze_customer(facts),
            Category::Technical => analyze_technical(facts, rules),
            Category::Behavioral => analyze_behavioral(facts, rules),
        }
    }
}

pub fn analyze_security_fee(facts: &OrderFacts) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    if facts.has_security_fee {
        r.add(SECURITY_FEE_POINTS, "security_fee_applied", "Honeypot security fee on order");
    }
    r
}

pub fn analyze_email(facts: &OrderFacts, rules: &ScoringRules) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    let email = facts.email.trim();

    if email.is_empty() || !EMAIL_RE.is_match(email) {
        r.add(INVALID_EMAIL_POINTS, "invalid_email", "Missing or malformed email");
    }
    if email.is_empty() {
        return r;
    }

    let (local, domain) = match email.rsplit_once('@') {
        Some((local, domain)) => (local, domain.to_lowercase()),
        None => (email, String::new()),
    };

    if !domain.is_empty() && rules.disposable_domains.contains(&domain) {
        r.add(TEMP_EMAIL_POINTS, "temp_email", format!("Disposable email domain {}", domain));
    }
    if DIGIT_RUN_RE.is_match(local) {
        r.add(EMAIL_DIGITS_POINTS, "suspicious_email_pattern", "Long digit run in email");
    }
    r
}

pub fn analyze_geography(facts: &OrderFacts, rules: &ScoringRules) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    let billing = facts.billing_country.trim().to_uppercase();
    let shipping = facts.shipping_country.trim().to_uppercase();

    if !billing.is_empty() && rules.high_risk_countries.contains(&billing) {
        r.add(HIGH_RISK_COUNTRY_POINTS, "high_risk_country", format!("High-risk billing country {}", billing));
    }
    if !shipping.is_empty() && shipping != billing {
        r.add(
            COUNTRY_MISMATCH_POINTS,
            "country_mismatch",
            format!("Billing {} ships to {}", billing, shipping),
        );
    }
    r
}

pub fn analyze_order_value(facts: &OrderFacts) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    let amount = facts.amount;
    let items = facts.items_count;

    if amount > HIGH_AMOUNT {
        r.add(HIGH_AMOUNT_POINTS, "high_amount", format!("Amount {:.2} above {}", amount, HIGH_AMOUNT));
    }
    if amount > VERY_HIGH_AMOUNT {
        r.add(
            VERY_HIGH_AMOUNT_POINTS,
            "very_high_amount",
            format!("Amount {:.2} above {}", amount, VERY_HIGH_AMOUNT),
        );
    }
    if items > MANY_ITEMS {
        r.add(MANY_ITEMS_POINTS, "many_items", format!("{} items", items));
    }
    if items > EXCESSIVE_ITEMS {
        r.add(EXCESSIVE_ITEMS_POINTS, "excessive_items", format!("{} items above {}", items, EXCESSIVE_ITEMS));
    }
    if items > 0 && amount / (items as f64) < LOW_AVERAGE_PRICE {
        r.add(LOW_AVERAGE_PRICE_POINTS, "low_value_items", "Average item price below 5");
    }
    r
}

pub fn analyze_customer(facts: &OrderFacts) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    let name = facts.full_name();
    let len = name.chars().count();

    if facts.customer_id == 0 {
        r.add(GUEST_POINTS, "guest_checkout", "Guest checkout");
    }
    if len < MIN_NAME_CHARS {
        r.add(SHORT_NAME_POINTS, "invalid_name", "Name missing or too short");
    }
    if has_repeated_run(&name, REPEATED_CHAR_RUN) {
        r.add(REPEATED_NAME_POINTS, "suspicious_name", "Repeated characters in name");
    }
    if len > MAX_NAME_CHARS {
        r.add(LONG_NAME_POINTS, "long_name", "Name longer than 100 characters");
    }
    r
}

pub fn analyze_technical(facts: &OrderFacts, rules: &ScoringRules) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    let ip = facts.client.ip.trim();
    let ua = facts.client.user_agent.trim();

    if ip.is_empty() || !is_public_ip(ip) {
        r.add(INVALID_IP_POINTS, "invalid_ip", "Missing or non-public client IP");
    }
    if ua.chars().count() < MIN_USER_AGENT_CHARS {
        r.add(SHORT_USER_AGENT_POINTS, "suspicious_user_agent", "Missing or short user-agent");
    }

    let ua_lower = ua.to_lowercase();
    if let Some(sig) = rules.bot_signatures.iter().find(|sig| ua_lower.contains(sig.as_str())) {
        r.add(BOT_USER_AGENT_POINTS, "bot_user_agent", format!("Bot signature '{}' in user-agent", sig));
    }
    r
}

pub fn analyze_behavioral(facts: &OrderFacts, rules: &ScoringRules) -> RiskFactorResult {
    let mut r = RiskFactorResult::default();
    let method = facts.payment_method.trim().to_lowercase();

    if !method.is_empty() && rules.risky_payment_methods.contains(&method) {
        r.add(RISKY_PAYMENT_POINTS, "risky_payment_method", format!("Payment method {}", method));
    }
    r
}

/// `run` or more identical characters in a row
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut prev: Option<char> = None;
    let mut count = 0;
    for c in text.chars() {
        if Some(c) == prev {
            count += 1;
        } else {
            prev = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::client::ClientContext;

    fn rules() -> ScoringRules {
        ScoringRules::default()
    }

    #[test]
    fn test_email_checks_add_up() {
        let facts = OrderFacts {
            email: "user123456@Mailinator.com".into(),
            ..Default::default()
        };
        let r = analyze_email(&facts, &rules());
        assert_eq!(r.score, TEMP_EMAIL_POINTS + EMAIL_DIGITS_POINTS);
        assert!(r.tags.contains("temp_email"));
        assert!(r.tags.contains("suspicious_email_pattern"));

        let missing = analyze_email(&OrderFacts::default(), &rules());
        assert_eq!(missing.score, INVALID_EMAIL_POINTS);

        let malformed = OrderFacts {
            email: "not-an-email".into(),
            ..Default::default()
        };
        assert_eq!(analyze_email(&malformed, &rules()).score, INVALID_EMAIL_POINTS);

        let five_digits = OrderFacts {
            email: "jane12345@gmail.com".into(),
            ..Default::default()
        };
        assert!(analyze_email(&five_digits, &rules()).is_clean());
    }

    #[test]
    fn test_geography() {
        let facts = OrderFacts {
            billing_country: "ng".into(),
            shipping_country: "FR".into(),
            ..Default::default()
        };
        let r = analyze_geography(&facts, &rules());
        assert_eq!(r.score, HIGH_RISK_COUNTRY_POINTS + COUNTRY_MISMATCH_POINTS);

        let same = OrderFacts {
            billing_country: "FR".into(),
            shipping_country: "fr".into(),
            ..Default::default()
        };
        assert!(analyze_geography(&same, &rules()).is_clean());

        let no_shipping = OrderFacts {
            billing_country: "DE".into(),
            ..Default::default()
        };
        assert!(analyze_geography(&no_shipping, &rules()).is_clean());
    }

    #[test]
    fn test_order_value_thresholds_stack() {
        let facts = OrderFacts {
            amount: 2500.0,
            items_count: 60,
            ..Default::default()
        };
        let r = analyze_order_value(&facts);
        assert_eq!(
            r.score,
            HIGH_AMOUNT_POINTS + VERY_HIGH_AMOUNT_POINTS + MANY_ITEMS_POINTS + EXCESSIVE_ITEMS_POINTS
        );

        let boundary = OrderFacts {
            amount: 1000.0,
            items_count: 20,
            ..Default::default()
        };
        assert!(analyze_order_value(&boundary).is_clean());

        let cheap = OrderFacts {
            amount: 8.0,
            items_count: 2,
            ..Default::default()
        };
        assert_eq!(analyze_order_value(&cheap).score, LOW_AVERAGE_PRICE_POINTS);

        let no_items = OrderFacts {
            amount: 1.0,
            ..Default::default()
        };
        assert!(analyze_order_value(&no_items).is_clean());
    }

    #[test]
    fn test_customer_identity() {
        let guest = OrderFacts::default();
        let r = analyze_customer(&guest);
        assert_eq!(r.score, GUEST_POINTS + SHORT_NAME_POINTS);

        let repeated = OrderFacts {
            customer_id: 9,
            first_name: "Aaaaa".into(),
            last_name: "Smith".into(),
            ..Default::default()
        };
        let r = analyze_customer(&repeated);
        assert_eq!(r.score, REPEATED_NAME_POINTS);
        assert!(r.tags.contains("suspicious_name"));

        let long = OrderFacts {
            customer_id: 9,
            first_name: "ab".repeat(60),
            ..Default::default()
        };
        assert_eq!(analyze_customer(&long).score, LONG_NAME_POINTS);
    }

    #[test]
    fn test_technical_fingerprint() {
        let bot = OrderFacts::default().with_client(ClientContext::new("10.0.0.1", "curl/8.0"));
        let r = analyze_technical(&bot, &rules());
        assert_eq!(r.score, INVALID_IP_POINTS + SHORT_USER_AGENT_POINTS + BOT_USER_AGENT_POINTS);
        assert!(r.detail.contains("'curl'"));

        let browser = OrderFacts::default().with_client(ClientContext::new(
            "81.2.69.142",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Firefox/120.0",
        ));
        assert!(analyze_technical(&browser, &rules()).is_clean());

        // Only one bot signature counts even when several match
        let many = OrderFacts::default().with_client(ClientContext::new(
            "81.2.69.142",
            "python-requests headless crawler bot",
        ));
        assert_eq!(analyze_technical(&many, &rules()).score, BOT_USER_AGENT_POINTS);
    }

    #[test]
    fn test_behavioral() {
        let cod = OrderFacts {
            payment_method: "COD".into(),
            ..Default::default()
        };
        assert_eq!(analyze_behavioral(&cod, &rules()).score, RISKY_PAYMENT_POINTS);

        let card = OrderFacts {
            payment_method: "card".into(),
            ..Default::default()
        };
        assert!(analyze_behavioral(&card, &rules()).is_clean());
    }

    #[test]
    fn test_repeated_run() {
        assert!(has_repeated_run("xxxx", 4));
        assert!(!has_repeated_run("xxx", 4));
        assert!(!has_repeated_run("xxaxx", 4));
        assert!(!has_repeated_run("", 4));
    }
}
