use powerdash::core::{DEFAULT_ZONE_ALIASES, RegionId, ZoneResolver};

#[test]
fn default_table_covers_dashboard_zones() {
    let resolver = ZoneResolver::default();
    for zone in [
        "CH", "DE", "FR", "AT", "IT", "NL", "BE", "DK1", "NO2", "SE3", "FI", "PL", "ES", "UK",
    ] {
        assert!(resolver.resolve(zone).is_some(), "zone {zone} should resolve");
    }
    assert_eq!(resolver.len(), DEFAULT_ZONE_ALIASES.len());
}

#[test]
fn several_zones_alias_one_region() {
    let resolver = ZoneResolver::default();
    let sweden = RegionId::from("SWE");
    for zone in ["SE1", "SE2", "SE3", "SE4"] {
        assert_eq!(resolver.resolve(zone), Some(&sweden));
    }
    assert_eq!(resolver.resolve("UK"), resolver.resolve("GB"));
}

#[test]
fn lookup_is_case_insensitive_and_trimmed() {
    let resolver = ZoneResolver::default();
    assert_eq!(resolver.resolve("de"), Some(&RegionId::from("DEU")));
    assert_eq!(resolver.resolve(" fr "), Some(&RegionId::from("FRA")));
}

#[test]
fn unknown_zone_is_absent() {
    let resolver = ZoneResolver::default();
    assert_eq!(resolver.resolve("XX"), None);
    assert_eq!(resolver.resolve(""), None);
    assert_eq!(ZoneResolver::empty().resolve("DE"), None);
}

#[test]
fn regions_are_distinct_in_first_seen_order() {
    let resolver =
        ZoneResolver::from_pairs([("SE1", "SWE"), ("DE", "DEU"), ("SE2", "SWE")]).expect("valid");
    let regions: Vec<&str> = resolver.regions().into_iter().map(RegionId::as_str).collect();
    assert_eq!(regions, vec!["SWE", "DEU"]);
}

#[test]
fn conflicting_and_blank_pairs_are_rejected() {
    assert!(ZoneResolver::from_pairs([("DE", "DEU"), ("de", "AUT")]).is_err());
    assert!(ZoneResolver::from_pairs([(" ", "DEU")]).is_err());
    assert!(ZoneResolver::from_pairs([("DE", "")]).is_err());
    assert!(ZoneResolver::from_pairs([("DE", "DEU"), ("de", "DEU")]).is_ok());
}
