use std::str::FromStr;

use clap::{Parser, builder::NonEmptyStringValueParser};

use crate::{core::point::Tags, prelude::*};

#[derive(Parser)]
pub struct TagArgs {
    #[clap(
        long = "tag-source",
        env = "TAG_SOURCE",
        default_value = "SymoGEN24",
        value_parser = NonEmptyStringValueParser::new(),
    )]
    pub source: String,

    #[clap(
        long = "tag-site",
        env = "TAG_SITE",
        default_value = "home",
        value_parser = NonEmptyStringValueParser::new(),
    )]
    pub site: String,

    /// Extra tags as `key=value` pairs, separated by commas. They override `source` and `site`.
    #[clap(long = "tags", env = "TAGS", value_delimiter = ',')]
    pub extra: Vec<Tag>,
}

impl TagArgs {
    pub fn tags(&self) -> Tags {
        [("source", &self.source), ("site", &self.site)]
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.clone()))
            .chain(self.extra.iter().map(|tag| (tag.key.clone(), tag.value.clone())))
            .collect()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s.split_once('=').with_context(|| format!("`{s}` is not a `key=value` pair"))?;
        let (key, value) = (key.trim(), value.trim());
        ensure!(!key.is_empty(), "tag key is empty in `{s}`");
        ensure!(!value.is_empty(), "tag value is empty in `{s}`");
        Ok(Self { key: key.to_owned(), value: value.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag() -> Result {
        assert_eq!(
            " inverter = gen24 ".parse::<Tag>()?,
            Tag { key: "inverter".to_owned(), value: "gen24".to_owned() },
        );
        assert_eq!("note=a=b".parse::<Tag>()?.value, "a=b");
        Ok(())
    }

    #[test]
    fn test_parse_tag_err() {
        assert!("inverter".parse::<Tag>().is_err());
        assert!("=gen24".parse::<Tag>().is_err());
        assert!("room=".parse::<Tag>().is_err());
        assert!("room= ".parse::<Tag>().is_err());
    }

    #[test]
    fn test_empty_tags_rejected() {
        assert!(TagArgs::try_parse_from(["tags", "--tags", "room="]).is_err());
        assert!(TagArgs::try_parse_from(["tags", "--tag-site", ""]).is_err());
        assert!(TagArgs::try_parse_from(["tags", "--tag-source", ""]).is_err());
    }

    #[test]
    fn test_tags() -> Result {
        let args = TagArgs::try_parse_from([
            "tags",
            "--tag-site",
            "cabin",
            "--tags",
            "room=garage,source=override",
        ])?;
        let tags = args.tags();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags["site"], "cabin");
        assert_eq!(tags["source"], "override");
        assert_eq!(tags["room"], "garage");
        Ok(())
    }

    #[test]
    fn test_default_tags() -> Result {
        let tags = TagArgs::try_parse_from(["tags"])?.tags();
        assert_eq!(
            tags,
            Tags::from_iter([
                ("site".to_owned(), "home".to_owned()),
                ("source".to_owned(), "SymoGEN24".to_owned()),
            ]),
        );
        Ok(())
    }
}
