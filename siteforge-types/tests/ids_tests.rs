use proptest::prelude::*;
use siteforge_types::{ChannelId, CheckedStatus, ContentId, ScopeId, SiteId};

#[test]
fn display_matches_inner_value() {
    assert_eq!(SiteId::new(7).to_string(), "7");
    assert_eq!(ChannelId::new(42).to_string(), "42");
    assert_eq!(ContentId::new(9000).to_string(), "9000");
}

#[test]
fn parse_trims_whitespace() {
    assert_eq!(" 12 ".parse::<ChannelId>().unwrap(), ChannelId::new(12));
    assert!("abc".parse::<ChannelId>().is_err());
}

#[test]
fn serde_is_transparent() {
    let json = serde_json::to_string(&ChannelId::new(5)).unwrap();
    assert_eq!(json, "5");
    let back: ChannelId = serde_json::from_str("5").unwrap();
    assert_eq!(back, ChannelId::new(5));
}

#[test]
fn scope_ids_render_distinctly() {
    assert_eq!(ScopeId::Channel(ChannelId::new(3)).to_string(), "c3");
    assert_eq!(ScopeId::Site(SiteId::new(3)).to_string(), "s3");
    assert_eq!(ScopeId::System.to_string(), "sys");
}

#[test]
fn checked_status_defaults_to_all() {
    assert_eq!(CheckedStatus::default(), CheckedStatus::All);
    assert!(CheckedStatus::All.is_all());
    assert!(!CheckedStatus::CheckedOnly.is_all());
}

proptest! {
    #[test]
    fn channel_id_roundtrips_through_string(id in any::<i32>()) {
        let original = ChannelId::new(id);
        let parsed: ChannelId = original.to_string().parse().unwrap();
        prop_assert_eq!(parsed, original);
    }

    #[test]
    fn content_id_roundtrips_through_string(id in any::<i64>()) {
        let original = ContentId::new(id);
        let parsed: ContentId = original.to_string().parse().unwrap();
        prop_assert_eq!(parsed, original);
    }
}
