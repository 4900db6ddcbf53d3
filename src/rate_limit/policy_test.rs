use super::*;

#[test]
fn parses_simple_policy() {
    let policy: Policy = "30/minute".parse().unwrap();
    assert_eq!(policy.max(), 30);
    assert_eq!(policy.period_secs(), 60);
    assert_eq!(policy.period_label(), "minute");
}

#[test]
fn parses_multiplied_period() {
    let policy: Policy = "5/10 seconds".parse().unwrap();
    assert_eq!(policy.max(), 5);
    assert_eq!(policy.period_secs(), 10);
    assert_eq!(policy.period_label(), "10 seconds");
}

#[test]
fn parses_all_granularities() {
    let cases = [
        ("1/second", 1),
        ("1/minute", 60),
        ("1/hour", 3600),
        ("1/day", 86_400),
        ("1/2 days", 172_800),
    ];
    for (raw, secs) in cases {
        let policy: Policy = raw.parse().unwrap();
        assert_eq!(policy.period_secs(), secs, "period of {raw}");
    }
}

#[test]
fn accepts_plural_and_padding() {
    let policy: Policy = " 300 / minutes ".parse().unwrap();
    assert_eq!(policy.max(), 300);
    assert_eq!(policy.period_secs(), 60);
}

#[test]
fn display_round_trips() {
    for raw in ["30/minute", "300/minute", "5/10 seconds", "1000/day"] {
        let policy: Policy = raw.parse().unwrap();
        assert_eq!(policy.to_string(), raw);
        let reparsed: Policy = policy.to_string().parse().unwrap();
        assert_eq!(reparsed, policy);
    }
}

#[test]
fn rejects_missing_slash() {
    assert!(matches!(
        "30 per minute".parse::<Policy>(),
        Err(PolicyParseError::Malformed(_))
    ));
}

#[test]
fn rejects_bad_count() {
    assert!(matches!("abc/minute".parse::<Policy>(), Err(PolicyParseError::InvalidCount(_))));
    assert!(matches!("0/minute".parse::<Policy>(), Err(PolicyParseError::InvalidCount(_))));
    assert!(matches!("-1/minute".parse::<Policy>(), Err(PolicyParseError::InvalidCount(_))));
}

#[test]
fn rejects_bad_multiplier() {
    assert!(matches!(
        "5/0 seconds".parse::<Policy>(),
        Err(PolicyParseError::InvalidMultiplier(_))
    ));
    assert!(matches!(
        "5/x seconds".parse::<Policy>(),
        Err(PolicyParseError::InvalidMultiplier(_))
    ));
}

#[test]
fn rejects_unknown_granularity() {
    assert!(matches!(
        "30/fortnight".parse::<Policy>(),
        Err(PolicyParseError::UnknownGranularity(_))
    ));
    assert!(matches!("30/".parse::<Policy>(), Err(PolicyParseError::UnknownGranularity(_))));
}
