//! Zone selection for a destination.

use crate::types::CountryCode;

use super::zone::{ShippingZone, normalize_region};

/// Select the single best zone for a destination.
///
/// 1. Inactive zones and zones that do not serve `country` are discarded.
/// 2. Remaining zones are ranked: zones listing `region` first, then
///    country-wide zones (no `regions`), then zones restricted to other
///    regions. Only the best non-empty tier stays in the running.
/// 3. The lowest `priority` wins; on a tie the zone that comes first in
///    `zones` wins, so the result is stable for identical inputs.
///
/// Returns `None` when no active zone serves `country`.
#[must_use]
pub fn match_zone<'a>(
    country: &CountryCode,
    region: Option<&str>,
    zones: &'a [ShippingZone],
) -> Option<&'a ShippingZone> {
    let region = region.map(normalize_region).filter(|r| !r.is_empty());

    let mut best: Option<(Tier, &ShippingZone)> = None;
    for zone in zones
        .iter()
        .filter(|z| z.is_active && z.serves_country(country))
    {
        let tier = Tier::of(zone, region.as_deref());
        best = match best {
            Some((t, current)) if (t, current.priority) <= (tier, zone.priority) => {
                Some((t, current))
            }
            _ => Some((tier, zone)),
        };
    }

    best.map(|(_, zone)| zone)
}

/// How closely a zone's region list fits the destination. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    ListsRegion,
    CountryWide,
    OtherRegions,
}

impl Tier {
    fn of(zone: &ShippingZone, region: Option<&str>) -> Self {
        if region.is_some_and(|r| zone.lists_region(r)) {
            Self::ListsRegion
        } else if zone.is_country_wide() {
            Self::CountryWide
        } else {
            Self::OtherRegions
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shipping::zone::DeliveryEstimate;
    use crate::types::{LocalizedText, Money, ZoneId};

    fn zone(id: i32, countries: &[&str], regions: &[&str], priority: i32) -> ShippingZone {
        ShippingZone {
            id: ZoneId::new(id),
            name: LocalizedText::new("Zone", "Zone", "Zona").unwrap(),
            countries: countries
                .iter()
                .map(|c| CountryCode::parse(c).unwrap())
                .collect(),
            regions: regions.iter().map(ToString::to_string).collect(),
            shipping_cost: Money::from_minor(1000).unwrap(),
            free_shipping_threshold: None,
            estimated_delivery_days: DeliveryEstimate { min: 1, max: 2 },
            is_active: true,
            priority,
        }
    }

    fn sn() -> CountryCode {
        CountryCode::parse("SN").unwrap()
    }

    #[test]
    fn test_no_zones() {
        assert!(match_zone(&sn(), None, &[]).is_none());
    }

    #[test]
    fn test_inactive_zone_skipped() {
        let mut inactive = zone(1, &["SN"], &[], 1);
        inactive.is_active = false;
        let zones = [inactive, zone(2, &["SN"], &[], 5)];
        assert_eq!(match_zone(&sn(), None, &zones).unwrap().id, ZoneId::new(2));

        let only_inactive = [zones[0].clone()];
        assert!(match_zone(&sn(), None, &only_inactive).is_none());
    }

    #[test]
    fn test_region_match_beats_lower_priority() {
        let zones = [zone(1, &["SN"], &[], 1), zone(2, &["SN"], &["Dakar"], 9)];
        let picked = match_zone(&sn(), Some("dakar"), &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(2));
    }

    #[test]
    fn test_unlisted_region_falls_back_to_country_wide() {
        let zones = [zone(1, &["SN"], &[], 5), zone(2, &["SN"], &["Dakar"], 1)];
        let picked = match_zone(&sn(), Some("Thiès"), &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(1));
    }

    #[test]
    fn test_no_region_prefers_country_wide() {
        let zones = [zone(1, &["SN"], &["Dakar"], 1), zone(2, &["SN"], &[], 4)];
        let picked = match_zone(&sn(), None, &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(2));
    }

    #[test]
    fn test_blank_region_treated_as_absent() {
        let zones = [zone(1, &["SN"], &[], 2), zone(2, &["SN"], &["Dakar"], 1)];
        let picked = match_zone(&sn(), Some("   "), &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(1));
    }

    #[test]
    fn test_other_region_zones_are_last_resort() {
        let zones = [
            zone(1, &["SN"], &["Dakar"], 3),
            zone(2, &["SN"], &["Saint-Louis"], 2),
        ];
        let picked = match_zone(&sn(), Some("Thiès"), &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(2));

        let picked = match_zone(&sn(), None, &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(2));
    }

    #[test]
    fn test_priority_tie_keeps_first() {
        let zones = [zone(4, &["SN"], &[], 1), zone(3, &["SN"], &[], 1)];
        let picked = match_zone(&sn(), None, &zones).unwrap();
        assert_eq!(picked.id, ZoneId::new(4));
    }

    #[test]
    fn test_multi_country_zone() {
        let zones = [zone(1, &["SN", "ML", "CI"], &[], 1)];
        let ml = CountryCode::parse("ml").unwrap();
        assert!(match_zone(&ml, None, &zones).is_some());
        let fr = CountryCode::parse("FR").unwrap();
        assert!(match_zone(&fr, None, &zones).is_none());
    }
}
