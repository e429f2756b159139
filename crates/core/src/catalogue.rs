//! Static catalogue configuration: the family/alias table, the bare-acronym
//! list, the city-alias table, and the family-to-session-name predicates.
//!
//! Everything here is immutable configuration owned by the core. Order
//! matters: alias resolution is first-match-wins in catalogue order.

use crate::normalize::{contains_token, normalize};

/// One canonical course family plus the alias phrases that resolve to it.
///
/// Aliases are stored pre-normalized (lowercase, no punctuation) so the
/// resolver can test substring containment against normalized user text
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct FamilyEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

/// The family catalogue, in resolution order. Refresher entries sit next to
/// their base family; both resolve to the same base name, with the refresher
/// signal carried separately by the token pass.
pub const FAMILY_CATALOGUE: &[FamilyEntry] = &[
    FamilyEntry {
        name: "SMSTS",
        aliases: &[
            "site management safety training scheme",
            "site management safety training",
            "site managers safety training",
        ],
    },
    FamilyEntry {
        name: "SMSTS Refresher",
        aliases: &[
            "site management safety training scheme refresher",
            "smsts refresher",
        ],
    },
    FamilyEntry {
        name: "SSSTS",
        aliases: &[
            "site supervision safety training scheme",
            "site supervisors safety training",
            "site supervision safety training",
        ],
    },
    FamilyEntry {
        name: "SSSTS Refresher",
        aliases: &[
            "site supervision safety training scheme refresher",
            "sssts refresher",
        ],
    },
    FamilyEntry {
        name: "TWC",
        aliases: &[
            "temporary works coordinator",
            "temporary works co ordinator",
        ],
    },
    FamilyEntry {
        name: "TWC Refresher",
        aliases: &[
            "temporary works coordinator refresher",
            "twc refresher",
        ],
    },
    FamilyEntry {
        name: "TWS",
        aliases: &[
            "temporary works supervisor",
        ],
    },
    FamilyEntry {
        name: "SEATS",
        aliases: &[
            "site environmental awareness training scheme",
            "environmental awareness training",
        ],
    },
    FamilyEntry {
        name: "HSA",
        aliases: &[
            "health and safety awareness",
            "health & safety awareness",
        ],
    },
    FamilyEntry {
        name: "NEBOSH General",
        aliases: &[
            "nebosh national general certificate",
            "nebosh general certificate",
        ],
    },
    FamilyEntry {
        name: "NEBOSH Construction",
        aliases: &[
            "nebosh national certificate in construction",
            "nebosh construction certificate",
        ],
    },
    FamilyEntry {
        name: "IEMA",
        aliases: &[
            "iema foundation certificate",
            "environmental management foundation",
        ],
    },
    FamilyEntry {
        name: "MHFA",
        aliases: &[
            "mental health first aid",
            "mental health first aider",
        ],
    },
    FamilyEntry {
        name: "IOSH Managing Safely",
        aliases: &["iosh managing safely"],
    },
    FamilyEntry {
        name: "IOSH Working Safely",
        aliases: &["iosh working safely"],
    },
    FamilyEntry {
        name: "EUSR Water Hygiene AM",
        aliases: &["eusr water hygiene am"],
    },
    FamilyEntry {
        name: "EUSR Water Hygiene PM",
        aliases: &["eusr water hygiene pm"],
    },
];

/// Bare acronyms checked as substrings when no alias matches, in order.
/// "IOSH", "EUSR" and "NEBOSH" resolve to generic placeholders. The scan is
/// deliberately not word-bounded; an acronym inside a longer token still
/// matches (known heuristic limitation, relied on by existing aliases).
pub const BARE_ACRONYMS: &[(&str, &str)] = &[
    ("smsts", "SMSTS"),
    ("sssts", "SSSTS"),
    ("twc", "TWC"),
    ("tws", "TWS"),
    ("seats", "SEATS"),
    ("eusr", "EUSR"),
    ("hsa", "HSA"),
    ("nebosh", "NEBOSH"),
    ("iema", "IEMA"),
    ("mhfa", "MHFA"),
    ("iosh", "IOSH"),
];

/// City alias table: canonical city key -> phrases that map to it.
pub const CITY_ALIASES: &[(&str, &[&str])] = &[
    ("london", &["london", "stratford", "croydon", "romford", "wembley"]),
    ("birmingham", &["birmingham", "solihull"]),
    ("manchester", &["manchester", "salford", "trafford"]),
    ("leeds", &["leeds"]),
    ("bristol", &["bristol"]),
    ("nottingham", &["nottingham"]),
    ("glasgow", &["glasgow"]),
    ("cardiff", &["cardiff"]),
];

/// Strip a trailing "Refresher" token from a catalogue entry name.
pub fn base_family(name: &str) -> &str {
    name.strip_suffix(" Refresher").unwrap_or(name)
}

/// A family is refresher-capable iff a "<Family> Refresher" entry exists.
pub fn is_refresher_capable(family: &str) -> bool {
    FAMILY_CATALOGUE
        .iter()
        .any(|entry| entry.name.strip_suffix(" Refresher") == Some(family))
}

/// Canonical base families (refresher entries excluded), in catalogue order.
pub fn base_families() -> impl Iterator<Item = &'static str> {
    FAMILY_CATALOGUE
        .iter()
        .filter(|entry| !entry.name.ends_with(" Refresher"))
        .map(|entry| entry.name)
}

/// Refresher-capable base families, in catalogue order.
pub fn refresher_capable_families() -> impl Iterator<Item = &'static str> {
    base_families().filter(|name| is_refresher_capable(name))
}

// ============================================================================
// Family-to-session-name predicates
// ============================================================================

/// Does a session display name belong to the given concrete family?
///
/// Each family has a fixed predicate over the lower-cased display name.
/// Standard/Refresher pairs are gated on the "refresher" token so the two
/// variants never cross-match. Generic placeholder families ("IOSH", "EUSR",
/// "NEBOSH") never match a session name; they must be specialized through
/// the validator's clarification path before a search runs.
pub fn session_matches_family(family: &str, session_name: &str) -> bool {
    let name = session_name.to_lowercase();
    let refresher = name.contains("refresher");

    match family {
        "SMSTS" => name.contains("smsts") && !refresher,
        "SMSTS Refresher" => name.contains("smsts") && refresher,
        "SSSTS" => name.contains("sssts") && !refresher,
        "SSSTS Refresher" => name.contains("sssts") && refresher,
        "TWC" => {
            (name.contains("temporary works coordinator")
                || name.contains("temporary works co-ordinator")
                || name.contains("twc"))
                && !refresher
        }
        "TWC Refresher" => {
            (name.contains("temporary works coordinator")
                || name.contains("temporary works co-ordinator")
                || name.contains("twc"))
                && refresher
        }
        "TWS" => {
            name.contains("temporary works supervisor") || name.contains("tws")
        }
        "SEATS" => name.contains("seats") || name.contains("environmental awareness"),
        "HSA" => {
            name.contains("health and safety awareness")
                || name.contains("health & safety awareness")
                || name.contains("hsa")
        }
        "NEBOSH General" => name.contains("nebosh") && name.contains("general"),
        "NEBOSH Construction" => name.contains("nebosh") && name.contains("construction"),
        "IEMA" => name.contains("iema") || name.contains("environmental management"),
        "MHFA" => name.contains("mental health first aid") || name.contains("mhfa"),
        "IOSH Managing Safely" => name.contains("managing safely"),
        "IOSH Working Safely" => name.contains("working safely"),
        "EUSR Water Hygiene AM" => {
            name.contains("water hygiene") && contains_token(&normalize(&name), "am")
        }
        "EUSR Water Hygiene PM" => {
            name.contains("water hygiene") && contains_token(&normalize(&name), "pm")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_is_normalized() {
        for entry in FAMILY_CATALOGUE {
            for alias in entry.aliases {
                assert_eq!(*alias, normalize(alias), "alias not stored normalized");
            }
        }
    }

    #[test]
    fn test_base_family_strips_refresher() {
        assert_eq!(base_family("SMSTS Refresher"), "SMSTS");
        assert_eq!(base_family("TWS"), "TWS");
    }

    #[test]
    fn test_refresher_capability() {
        assert!(is_refresher_capable("SMSTS"));
        assert!(is_refresher_capable("SSSTS"));
        assert!(is_refresher_capable("TWC"));
        assert!(!is_refresher_capable("TWS"));
        assert!(!is_refresher_capable("MHFA"));
    }

    #[test]
    fn test_standard_refresher_pairs_never_cross_match() {
        let standard = "SMSTS | Stratford | 5 days";
        let refresher = "SMSTS Refresher | Stratford | 2 days";
        assert!(session_matches_family("SMSTS", standard));
        assert!(!session_matches_family("SMSTS", refresher));
        assert!(session_matches_family("SMSTS Refresher", refresher));
        assert!(!session_matches_family("SMSTS Refresher", standard));
    }

    #[test]
    fn test_eusr_variants_are_disjoint() {
        let am = "EUSR Water Hygiene | Online | AM";
        let pm = "EUSR Water Hygiene | Online | PM";
        assert!(session_matches_family("EUSR Water Hygiene AM", am));
        assert!(!session_matches_family("EUSR Water Hygiene AM", pm));
        assert!(session_matches_family("EUSR Water Hygiene PM", pm));
        assert!(!session_matches_family("EUSR Water Hygiene PM", am));
    }

    #[test]
    fn test_generic_placeholders_never_match_sessions() {
        for name in [
            "IOSH Managing Safely | Leeds | 3 days",
            "EUSR Water Hygiene | Online | AM",
            "NEBOSH General Certificate | Manchester",
        ] {
            assert!(!session_matches_family("IOSH", name));
            assert!(!session_matches_family("EUSR", name));
            assert!(!session_matches_family("NEBOSH", name));
        }
    }

    #[test]
    fn test_nebosh_certificates_discriminate() {
        let general = "NEBOSH General Certificate | Birmingham";
        let construction = "NEBOSH Construction Certificate | Birmingham";
        assert!(session_matches_family("NEBOSH General", general));
        assert!(!session_matches_family("NEBOSH General", construction));
        assert!(session_matches_family("NEBOSH Construction", construction));
    }
}
