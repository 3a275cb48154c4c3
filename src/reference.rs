use winnow::combinator::{opt, preceded};
use winnow::prelude::*;
use winnow::token::{rest, take_till};

/// A package reference split into its parts: `name/version[#revision]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
    pub revision: Option<String>,
}

/// Split a reference on the first `/` and strip any `#revision` from the
/// version. Never fails: a reference without `/` becomes the name as-is,
/// with an empty version.
pub fn parse_ref(reference: &str) -> PackageRef {
    match package_ref.parse(reference) {
        Ok(parsed) => parsed,
        Err(_) => PackageRef {
            name: reference.to_string(),
            version: String::new(),
            revision: None,
        },
    }
}

fn package_ref(input: &mut &str) -> winnow::Result<PackageRef> {
    let name = take_till(0.., '/').parse_next(input)?;
    '/'.parse_next(input)?;
    let version = take_till(0.., '#').parse_next(input)?;
    let revision = opt(preceded('#', rest)).parse_next(input)?;
    Ok(PackageRef {
        name: name.to_string(),
        version: version.to_string(),
        revision: revision.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_name_and_version() {
        let r = parse_ref("zlib/1.3.1");
        assert_eq!(r.name, "zlib");
        assert_eq!(r.version, "1.3.1");
        assert_eq!(r.revision, None);
    }

    #[test]
    fn parse_strips_revision() {
        let r = parse_ref("openssl/3.2.1#8f4cf6abc");
        assert_eq!(r.name, "openssl");
        assert_eq!(r.version, "3.2.1");
        assert_eq!(r.revision.as_deref(), Some("8f4cf6abc"));
    }

    #[test]
    fn parse_splits_on_first_slash_only() {
        let r = parse_ref("boost/1.84.0@acme/stable#abc");
        assert_eq!(r.name, "boost");
        assert_eq!(r.version, "1.84.0@acme/stable");
        assert_eq!(r.revision.as_deref(), Some("abc"));
    }

    #[test]
    fn parse_revision_cut_at_first_hash() {
        let r = parse_ref("fmt/10.2.1#aa#bb");
        assert_eq!(r.version, "10.2.1");
        assert_eq!(r.revision.as_deref(), Some("aa#bb"));
    }

    #[test]
    fn parse_without_slash_falls_back_to_whole_ref() {
        let r = parse_ref("conanfile");
        assert_eq!(r.name, "conanfile");
        assert_eq!(r.version, "");
    }

    #[test]
    fn parse_empty_ref() {
        let r = parse_ref("");
        assert_eq!(r.name, "");
        assert_eq!(r.version, "");
        assert_eq!(r.revision, None);
    }

    #[test]
    fn parse_empty_revision() {
        let r = parse_ref("cmake/3.27#");
        assert_eq!(r.version, "3.27");
        assert_eq!(r.revision.as_deref(), Some(""));
    }
}
