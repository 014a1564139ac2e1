// ABOUTME: Integration tests for validated domain types.
// ABOUTME: Tests image references, tags, workload names, and platforms.

use kaas_build::source::normalize_url;
use kaas_build::types::*;
use proptest::prelude::*;

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_simple_name() {
        let img = ImageRef::parse("nginx").unwrap();
        assert_eq!(img.name(), "nginx");
        assert_eq!(img.tag(), Some("latest"));
        assert!(img.registry().is_none());
        assert!(img.digest().is_none());
    }

    #[test]
    fn parse_with_registry_port() {
        let img = ImageRef::parse("localhost:5000/team/app:v2").unwrap();
        assert_eq!(img.registry(), Some("localhost:5000"));
        assert_eq!(img.name(), "team/app");
        assert_eq!(img.tag(), Some("v2"));
    }

    #[test]
    fn parse_with_digest() {
        let img = ImageRef::parse("nginx@sha256:abc123").unwrap();
        assert_eq!(img.digest(), Some("sha256:abc123"));
        assert!(img.tag().is_none());
    }

    #[test]
    fn scratch_is_recognized() {
        assert!(ImageRef::parse("scratch").unwrap().is_scratch());
        assert!(!ImageRef::parse("registry.io/scratch").unwrap().is_scratch());
    }

    #[test]
    fn invalid_references_fail() {
        assert!(ImageRef::parse("").is_err());
        assert!(ImageRef::parse("bad image").is_err());
        assert!(ImageRef::parse("nginx:").is_err());
    }
}

mod image_tag_tests {
    use super::*;

    #[test]
    fn registry_prefix_is_added_once() {
        let tag = ImageTag::new("svc:1").unwrap();
        let pushed = tag.in_registry("localhost:5000");
        assert_eq!(pushed.as_str(), "localhost:5000/svc:1");
        assert_eq!(pushed.in_registry("localhost:5000"), pushed);
    }

    #[test]
    fn split_ignores_registry_port() {
        let tag = ImageTag::new("localhost:5000/svc").unwrap();
        assert_eq!(tag.repository_and_tag(), ("localhost:5000/svc", "latest"));
    }
}

mod workload_name_tests {
    use super::*;

    #[test]
    fn valid_dns_label() {
        assert_eq!(WorkloadName::new("my-svc-2").unwrap().as_str(), "my-svc-2");
        assert!(WorkloadName::new(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn invalid_labels() {
        assert_eq!(WorkloadName::new(""), Err(WorkloadNameError::Empty));
        assert_eq!(
            WorkloadName::new(&"a".repeat(64)),
            Err(WorkloadNameError::TooLong)
        );
        assert_eq!(WorkloadName::new("-svc"), Err(WorkloadNameError::BadStart));
        assert_eq!(WorkloadName::new("svc-"), Err(WorkloadNameError::BadEnd));
        assert_eq!(
            WorkloadName::new("My_Svc"),
            Err(WorkloadNameError::InvalidChar('M'))
        );
    }
}

mod platform_tests {
    use super::*;

    #[test]
    fn maps_rust_targets() {
        assert_eq!(
            Platform::from_target("linux", "x86_64").unwrap(),
            Platform::new("linux", "amd64")
        );
        assert_eq!(
            Platform::from_target("linux", "aarch64").unwrap(),
            Platform::new("linux", "arm64")
        );
        assert_eq!(
            Platform::from_target("macos", "aarch64").unwrap(),
            Platform::new("darwin", "arm64")
        );
    }

    #[test]
    fn unmapped_arch_is_an_error() {
        assert!(matches!(
            Platform::from_target("linux", "mips"),
            Err(PlatformError::UnmappedArch(_))
        ));
    }

    #[test]
    fn parses_os_arch_strings() {
        let p: Platform = "linux/arm64/v8".parse().unwrap();
        assert_eq!(p, Platform::new("linux", "arm64"));
        assert_eq!(p.to_string(), "linux/arm64");
        assert!("linux".parse::<Platform>().is_err());
    }
}

proptest! {
    #[test]
    fn generated_dns_labels_are_accepted(name in "[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?") {
        prop_assert!(WorkloadName::new(&name).is_ok());
    }

    #[test]
    fn uppercase_never_accepted(prefix in "[a-z]{0,10}", upper in "[A-Z]", suffix in "[a-z]{0,10}") {
        let name = format!("{prefix}{upper}{suffix}");
        prop_assert!(WorkloadName::new(&name).is_err());
    }

    #[test]
    fn url_normalization_is_idempotent(
        scheme in "https?",
        creds in proptest::option::of("[a-z]{1,8}:[a-z0-9]{1,8}@"),
        host in "[a-z]{1,10}\\.com",
        path in "/[a-z]{1,10}\\.git",
    ) {
        let url = format!("{scheme}://{}{host}{path}", creds.unwrap_or_default());
        let once = normalize_url(&url);
        prop_assert!(once.starts_with("https://:@"));
        prop_assert_eq!(normalize_url(&once), once.clone());
    }
}
