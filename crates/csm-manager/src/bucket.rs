use csm_types::{BucketRef, TypeError};

/// Chooses the bucket an operation targets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BucketResolver {
    default: Option<BucketRef>,
}

impl BucketResolver {
    pub fn new(default: Option<BucketRef>) -> Self {
        Self { default }
    }

    pub fn default_bucket(&self) -> Option<&BucketRef> {
        self.default.as_ref()
    }

    /// A non-empty call-site bucket always wins; otherwise the default is
    /// used. No merging of the two ever happens.
    pub fn resolve(&self, call_site: Option<&str>) -> Result<BucketRef, TypeError> {
        resolve(call_site, self.default.as_ref())
    }
}

/// Free-standing form of [`BucketResolver::resolve`].
pub fn resolve(call_site: Option<&str>, default: Option<&BucketRef>) -> Result<BucketRef, TypeError> {
    match call_site.filter(|b| !b.is_empty()) {
        Some(bucket) => BucketRef::new(bucket),
        None => default.cloned().ok_or(TypeError::MissingBucket),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bucket(name: &str) -> BucketRef {
        BucketRef::new(name).unwrap()
    }

    #[test]
    fn call_site_overrides_default() {
        let resolver = BucketResolver::new(Some(bucket("default")));
        assert_eq!(resolver.resolve(Some("explicit")).unwrap(), bucket("explicit"));
    }

    #[test]
    fn default_used_when_call_site_absent_or_empty() {
        let resolver = BucketResolver::new(Some(bucket("default")));
        assert_eq!(resolver.resolve(None).unwrap(), bucket("default"));
        assert_eq!(resolver.resolve(Some("")).unwrap(), bucket("default"));
    }

    #[test]
    fn neither_is_an_error() {
        assert_eq!(resolve(None, None), Err(TypeError::MissingBucket));
        assert_eq!(
            BucketResolver::default().resolve(Some("")),
            Err(TypeError::MissingBucket)
        );
    }

    proptest! {
        #[test]
        fn non_empty_call_site_always_wins(
            call_site in "[a-z0-9-]{1,20}",
            default in proptest::option::of("[a-z0-9-]{1,20}"),
        ) {
            let default = default.map(|d| bucket(&d));
            let resolved = resolve(Some(&call_site), default.as_ref()).unwrap();
            prop_assert_eq!(resolved.as_str(), call_site.as_str());
        }
    }
}
