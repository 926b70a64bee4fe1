use serde::{Deserialize, Serialize};

/// Load state of the postcode lookup widget. Moves forward exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupReadiness {
    #[default]
    NotLoaded,
    Loaded,
}

impl LookupReadiness {
    pub fn is_ready(self) -> bool {
        self == LookupReadiness::Loaded
    }

    /// Returns `true` if this call performed the transition.
    pub fn mark_loaded(&mut self) -> bool {
        let changed = !self.is_ready();
        *self = LookupReadiness::Loaded;
        changed
    }
}

/// Answer to a request to open the lookup widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOpen {
    Open,
    NotReady,
}

/// Completion payload of the lookup widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostcodeResult {
    #[serde(default)]
    pub zonecode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_address: Option<String>,
    /// Address as the user picked it (road or lot-number form).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Lot-number address. The widget sends it next to `address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jibun_address: Option<String>,
}

impl PostcodeResult {
    /// First non-empty of road address, `address`, lot-number address; else empty.
    pub fn address1(&self) -> &str {
        [
            self.road_address.as_deref(),
            self.address.as_deref(),
            self.jibun_address.as_deref(),
        ]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_moves_forward_once() {
        let mut readiness = LookupReadiness::default();
        assert!(!readiness.is_ready());
        assert!(readiness.mark_loaded());
        assert!(readiness.is_ready());
        assert!(!readiness.mark_loaded());
        assert!(readiness.is_ready());
    }

    #[test]
    fn address1_prefers_road_address() {
        let result = PostcodeResult {
            zonecode: "06236".into(),
            road_address: Some("서울 강남구 테헤란로 152".into()),
            address: Some("서울 강남구 역삼동 737".into()),
            jibun_address: None,
        };
        assert_eq!(result.address1(), "서울 강남구 테헤란로 152");

        let lot_only = PostcodeResult {
            road_address: Some(String::new()),
            ..result.clone()
        };
        assert_eq!(lot_only.address1(), "서울 강남구 역삼동 737");

        assert_eq!(PostcodeResult::default().address1(), "");
    }

    #[test]
    fn decodes_widget_payload() {
        let result: PostcodeResult = serde_json::from_str(
            r#"{"zonecode":"13529","roadAddress":"경기 성남시 분당구 판교역로 235"}"#,
        )
        .unwrap();
        assert_eq!(result.zonecode, "13529");
        assert_eq!(result.address, None);
        assert_eq!(result.address1(), "경기 성남시 분당구 판교역로 235");

        let jibun: PostcodeResult = serde_json::from_str(
            r#"{"zonecode":"13529","roadAddress":"","jibunAddress":"경기 성남시 분당구 삼평동 681"}"#,
        )
        .unwrap();
        assert_eq!(jibun.address1(), "경기 성남시 분당구 삼평동 681");
    }

    #[test]
    fn decodes_payload_with_address_and_jibun_address() {
        let result: PostcodeResult = serde_json::from_str(
            r#"{"zonecode":"06236","address":"서울 강남구 테헤란로 152",
                "roadAddress":"서울 강남구 테헤란로 152","jibunAddress":"서울 강남구 역삼동 737"}"#,
        )
        .unwrap();
        assert_eq!(result.address.as_deref(), Some("서울 강남구 테헤란로 152"));
        assert_eq!(result.jibun_address.as_deref(), Some("서울 강남구 역삼동 737"));
        assert_eq!(result.address1(), "서울 강남구 테헤란로 152");

        let lot_only = PostcodeResult {
            road_address: None,
            address: Some(String::new()),
            ..result
        };
        assert_eq!(lot_only.address1(), "서울 강남구 역삼동 737");
    }
}
