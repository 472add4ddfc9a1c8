//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{
        ignore_entry, join_module_path, module_name_from_url, normalize, parent_directory,
        path_to_portable, to_host, to_portable,
    };
    use proptest::prelude::*;

    // ============================================================================
    // portable <-> host conversion property tests
    // ============================================================================

    proptest! {
        /// Property: portable -> host -> portable is lossless
        #[test]
        fn portable_host_round_trip(input in "[a-zA-Z0-9_./-]*") {
            let host = to_host(&input);
            prop_assert_eq!(path_to_portable(&host), input);
        }

        /// Property: host(portable(p)) == host(p) for host-form inputs
        #[test]
        fn host_form_is_stable(segments in prop::collection::vec("[a-zA-Z0-9_.-]{1,8}", 1..5)) {
            let host = segments.iter().collect::<std::path::PathBuf>();
            let host_str = host.to_string_lossy().to_string();
            prop_assert_eq!(to_host(&to_portable(&host_str)), to_host(&host_str));
        }

        /// Property: portable form never contains the host separator (unless it is '/')
        #[test]
        fn portable_form_has_no_host_separator(segments in prop::collection::vec("[a-z0-9]{1,8}", 1..5)) {
            let host = segments.iter().collect::<std::path::PathBuf>();
            let portable = path_to_portable(&host);
            if std::path::MAIN_SEPARATOR != '/' {
                prop_assert!(!portable.contains(std::path::MAIN_SEPARATOR));
            }
            prop_assert_eq!(portable, segments.join("/"));
        }
    }

    // ============================================================================
    // module path property tests
    // ============================================================================

    proptest! {
        /// Property: the parent of a joined module path is the normalized directory
        #[test]
        fn parent_of_join_is_directory(
            dirs in prop::collection::vec("[a-z0-9_-]{1,8}", 1..4),
            name in "[a-z0-9_-]{1,12}",
        ) {
            let directory = dirs.join("/");
            let joined = join_module_path(&directory, &name);
            prop_assert_eq!(parent_directory(&joined), normalize(&directory));
            prop_assert!(joined.ends_with(&name));
        }

        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(input in "[a-z./]*") {
            let once = normalize(&input);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        /// Property: ignore entries always end with exactly one slash
        #[test]
        fn ignore_entry_has_single_trailing_slash(input in "/?[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}/?") {
            let entry = ignore_entry(&input);
            prop_assert!(entry.ends_with('/'));
            prop_assert!(!entry.ends_with("//"));
            prop_assert!(!entry.starts_with('/'));
        }
    }

    // ============================================================================
    // module_name_from_url property tests
    // ============================================================================

    proptest! {
        /// Property: the derived name is the repository basename without `.git`
        #[test]
        fn name_is_repository_basename(
            owner in "[a-z0-9-]{1,10}",
            repo in "[a-z0-9_-]{1,12}",
            suffix in prop::bool::ANY,
        ) {
            let ext = if suffix { ".git" } else { "" };
            let https = format!("https://example.org/{}/{}{}", owner, repo, ext);
            let scp = format!("git@example.org:{}/{}{}", owner, repo, ext);
            prop_assert_eq!(module_name_from_url(&https).unwrap(), repo.clone());
            prop_assert_eq!(module_name_from_url(&scp).unwrap(), repo);
        }
    }
}
