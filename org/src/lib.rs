//! Org document library: a small tree model, a nom-based reader, a canonical writer,
//! structural outline queries, and the datetree locator used by importers.

pub mod core {
    use indexmap::IndexMap;
    use serde::{Deserialize, Serialize};
    use std::{fmt, path::PathBuf};

    /* ------------------------------ Aggregate ------------------------------ */

    /// Aggregate root: a single `.org` file.
    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct OrgFile {
        /// Optional filesystem path if the file originates from (or is bound to) disk.
        pub path: Option<PathBuf>,

        /// Lines before the first heading, kept verbatim.
        #[serde(default)]
        pub preamble: Vec<String>,

        /// Top-level headings.
        #[serde(default)]
        pub headings: Vec<Heading>,
    }

    impl OrgFile {
        pub fn new(path: Option<PathBuf>) -> Self {
            Self {
                path,
                preamble: vec![],
                headings: vec![],
            }
        }
    }

    /* ------------------------------ Entities ------------------------------ */

    /// A heading node with its metadata, section text and children.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Heading {
        /// Number of leading stars.
        pub level: u8,

        /// Headline text without stars and trailing tags.
        pub title: String,

        /// Tags after the headline (`:tag1:tag2:`), in source order.
        #[serde(default)]
        pub tags: Vec<Tag>,

        /// Raw SCHEDULED/DEADLINE/CLOSED lines directly below the headline.
        #[serde(default)]
        pub planning: Vec<String>,

        /// Property drawer (key/value string pairs).
        #[serde(default)]
        pub properties: PropertyDrawer,

        /// The section (content under this headline until the next heading).
        #[serde(default)]
        pub section: Section,

        /// Child headings.
        #[serde(default)]
        pub children: Vec<Heading>,
    }

    impl Heading {
        pub fn new(level: u8, title: impl Into<String>) -> Self {
            Self {
                level,
                title: title.into(),
                tags: vec![],
                planning: vec![],
                properties: PropertyDrawer::default(),
                section: Section::default(),
                children: vec![],
            }
        }
    }

    /* ---------------------------- Value Objects ---------------------------- */

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct Tag(pub String);

    impl From<&str> for Tag {
        fn from(s: &str) -> Self {
            Self(s.to_string())
        }
    }

    /// Property drawer; insertion order is kept and re-setting a key overwrites in place.
    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct PropertyDrawer {
        #[serde(default)]
        pub props: IndexMap<String, String>,
    }

    impl PropertyDrawer {
        pub fn get(&self, key: &str) -> Option<&str> {
            self.props.get(key).map(String::as_str)
        }

        /// Line breaks in `value` become single spaces; a drawer entry is one line.
        pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
            let value: String = value.into();
            let value = if value.contains(['\n', '\r']) {
                value
                    .split(['\n', '\r'])
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            } else {
                value
            };
            self.props.insert(key.into(), value);
        }

        pub fn is_empty(&self) -> bool {
            self.props.is_empty()
        }
    }

    /// Section content under a headline, one entry per line (no terminators).
    #[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Section {
        #[serde(default)]
        pub lines: Vec<String>,
    }

    impl Section {
        /// Append `text` line by line; a single trailing newline does not add an empty line.
        pub fn push_text(&mut self, text: &str) {
            if text.is_empty() {
                return;
            }
            let text = text.strip_suffix('\n').unwrap_or(text);
            self.lines.extend(text.split('\n').map(str::to_string));
        }

        pub fn has_text(&self) -> bool {
            self.lines.iter().any(|l| !l.trim().is_empty())
        }
    }

    /// Position of a heading: child indices from the top level down.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct HeadingPath(pub Vec<usize>);

    impl HeadingPath {
        pub fn top(index: usize) -> Self {
            Self(vec![index])
        }

        /// Path of `parent`'s child at `index`, or a top-level path when `parent` is `None`.
        pub fn under(parent: Option<&HeadingPath>, index: usize) -> Self {
            match parent {
                Some(p) => p.child(index),
                None => Self::top(index),
            }
        }

        pub fn child(&self, index: usize) -> Self {
            let mut v = self.0.clone();
            v.push(index);
            Self(v)
        }

        /// `None` for top-level headings.
        pub fn parent(&self) -> Option<Self> {
            match self.0.len() {
                0 | 1 => None,
                n => Some(Self(self.0[..n - 1].to_vec())),
            }
        }

        /// Index among siblings.
        pub fn index(&self) -> usize {
            self.0.last().copied().unwrap_or_default()
        }
    }

    impl fmt::Display for HeadingPath {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
            write!(f, "/{}", parts.join("/"))
        }
    }

    /* ---------------------------- Errors (domain) ---------------------------- */

    #[derive(Debug, thiserror::Error)]
    pub enum DomainError {
        #[error("no heading at {0}")]
        NoSuchHeading(HeadingPath),
        #[error("outline path {} not found", .0.join(" / "))]
        AnchorNotFound(Vec<String>),
        #[error("invalid date {0:?}")]
        InvalidDate(String),
    }
}

pub mod storage {
    use super::core::OrgFile;
    use super::format::format_org_file;
    use anyhow::{Context, Result, anyhow};
    use std::{fs, path::Path};

    /// Parsing is independent of where documents come from.
    pub trait OrgParser {
        fn parse_file(&self, abs_path: &Path) -> Result<OrgFile>;
    }

    /// Load `path` when it exists; otherwise start an empty document bound to it.
    /// The flag is `true` when the document is new.
    pub fn load_or_create(parser: &impl OrgParser, path: &Path) -> Result<(OrgFile, bool)> {
        if path.exists() {
            Ok((parser.parse_file(path)?, false))
        } else {
            Ok((OrgFile::new(Some(path.to_path_buf())), true))
        }
    }

    /// Write `file` back to its bound path.
    pub fn write_org_file(file: &OrgFile) -> Result<()> {
        let path = file
            .path
            .as_deref()
            .ok_or_else(|| anyhow!("document has no path to write to"))?;
        let text = format_org_file(file);
        fs::write(path, text.as_bytes()).with_context(|| format!("writing {:?}", path))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::core::Heading;
        use crate::parser::NomOrgParser;

        #[test]
        fn missing_file_starts_new_document_and_writes_back() {
            let tmp = tempfile::tempdir().expect("tempdir");
            let path = tmp.path().join("journal.org");

            let (mut file, is_new) = load_or_create(&NomOrgParser, &path).expect("load");
            assert!(is_new);
            file.headings.push(Heading::new(1, "2024"));
            write_org_file(&file).expect("write");

            let (reloaded, is_new) = load_or_create(&NomOrgParser, &path).expect("reload");
            assert!(!is_new);
            assert_eq!(reloaded.headings, file.headings);
            assert_eq!(fs::read_to_string(&path).expect("read"), "* 2024\n");
        }
    }
}

pub mod parser {
    //! Minimal Org parser built on `nom`.
    //!
    //! The top-level scan is line-oriented and stack-builds the heading tree by levels.
    //! Each headline is parsed with combinators (stars, title, tags). Under a headline we
    //! accept planning lines, then a property drawer, then raw section lines until the
    //! next headline. Anything else is kept verbatim.

    use crate::core::*;
    use crate::storage::OrgParser;
    use anyhow::{Context, Result, anyhow};
    use nom::{
        IResult,
        branch::alt,
        bytes::complete::{tag, take_till, take_while1},
        character::complete::{char, line_ending, not_line_ending, space0, space1},
        combinator::{opt, recognize},
        error::VerboseError,
        multi::many1,
        sequence::{terminated, tuple},
    };
    use std::{fs, path::Path, path::PathBuf};

    /* ------------------------ Public entry points ------------------------ */

    /// Parse an Org document from a string.
    pub fn parse_org_from_str(path: Option<PathBuf>, input: &str) -> Result<OrgFile> {
        let (rest, preamble) = parse_preamble(input).map_err(to_anyhow("preamble"))?;
        let (_rest, headings) = parse_headings_tree(rest).map_err(to_anyhow("headings"))?;

        let mut file = OrgFile::new(path);
        file.preamble = preamble;
        file.headings = headings;
        Ok(file)
    }

    /// Concrete parser implementing the `storage::OrgParser` trait.
    pub struct NomOrgParser;

    impl OrgParser for NomOrgParser {
        fn parse_file(&self, abs_path: &Path) -> Result<OrgFile> {
            let text =
                fs::read_to_string(abs_path).with_context(|| format!("reading {:?}", abs_path))?;
            parse_org_from_str(Some(abs_path.to_path_buf()), &text)
        }
    }

    type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

    fn to_anyhow(label: &'static str) -> impl Fn(nom::Err<VerboseError<&str>>) -> anyhow::Error {
        move |e| match e {
            nom::Err::Error(ve) | nom::Err::Failure(ve) => {
                let msg = pretty_verbose_error(label, ve);
                anyhow!(msg)
            }
            nom::Err::Incomplete(_) => anyhow!("incomplete input while parsing {}", label),
        }
    }

    fn pretty_verbose_error(label: &str, ve: VerboseError<&str>) -> String {
        use std::fmt::Write;
        let mut s = String::new();
        let _ = writeln!(s, "parse error in {}:", label);
        for (frag, kind) in ve.errors {
            let show = frag
                .get(0..frag.find('\n').unwrap_or(frag.len()))
                .unwrap_or(frag);
            let _ = writeln!(s, "  at: {:?}  {:?}", show, kind);
        }
        s
    }

    /* ------------------------------- Utils ------------------------------- */

    fn is_heading_line(s: &str) -> bool {
        // One-or-more '*' then at least one space.
        let stars = count_stars(s);
        stars >= 1 && s[stars..].starts_with(' ')
    }

    fn count_stars(s: &str) -> usize {
        s.chars().take_while(|c| *c == '*').count()
    }

    fn till_eol(i: &str) -> PResult<'_, &str> {
        // Only `\n` ends a line; a stray `\r` stays part of the line text.
        terminated(take_till(|c| c == '\n'), opt(char('\n')))(i)
    }

    fn line_ending_ve(i: &str) -> PResult<'_, &str> {
        line_ending(i)
    }

    fn is_tag_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '%')
    }

    /* ------------------------------ Preamble ------------------------------ */

    fn parse_preamble(mut i: &str) -> PResult<'_, Vec<String>> {
        let mut lines = Vec::new();
        while !i.is_empty() && !is_heading_line(i) {
            let (r, line) = till_eol(i)?;
            lines.push(line.to_string());
            i = r;
        }
        Ok((i, lines))
    }

    /* --------------------------- Headings section --------------------------- */

    /// Parse the entire heading tree. `i` must start at a headline (or be empty).
    fn parse_headings_tree(mut i: &str) -> PResult<'_, Vec<Heading>> {
        let mut stack: Vec<Heading> = Vec::new();
        let mut roots: Vec<Heading> = Vec::new();

        while !i.is_empty() {
            let (r, mut node) = parse_headline(i)?;
            i = r;

            while let Ok((r, line)) = parse_planning_line(i) {
                node.planning.push(line.to_string());
                i = r;
            }

            // Org only recognizes the drawer right after the headline/planning lines.
            if let Ok((r, drawer)) = parse_properties_drawer(i) {
                node.properties = drawer;
                i = r;
            }

            while !i.is_empty() && !is_heading_line(i) {
                let (r, line) = till_eol(i)?;
                node.section.lines.push(line.to_string());
                i = r;
            }

            // Place node into the tree using the current stack.
            while let Some(top) = stack.last() {
                if top.level < node.level {
                    break;
                }
                let Some(completed) = stack.pop() else { break };
                attach(&mut stack, &mut roots, completed);
            }
            stack.push(node);
        }

        while let Some(completed) = stack.pop() {
            attach(&mut stack, &mut roots, completed);
        }

        Ok((i, roots))
    }

    fn attach(stack: &mut [Heading], roots: &mut Vec<Heading>, completed: Heading) {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(completed);
        } else {
            roots.push(completed);
        }
    }

    /// Parse a single headline line (no trailing body).
    fn parse_headline(i: &str) -> PResult<'_, Heading> {
        let (i, stars) = recognize(many1(char('*')))(i)?;
        let level = u8::try_from(stars.len()).unwrap_or(u8::MAX);
        let (i, _) = space1(i)?;
        let (i, text) = till_eol(i)?;
        let text = text.trim_end();

        let (title, tags) = split_tags(text);
        let mut h = Heading::new(level, title);
        h.tags = tags;
        Ok((i, h))
    }

    fn split_tags(text: &str) -> (&str, Vec<Tag>) {
        let Some(pos) = text.rfind(|c: char| c == ' ' || c == '\t') else {
            return (text, vec![]);
        };
        let trail = &text[pos + 1..];
        if trail.len() < 3 || !trail.starts_with(':') || !trail.ends_with(':') {
            return (text, vec![]);
        }
        let names: Vec<&str> = trail[1..trail.len() - 1].split(':').collect();
        if names.iter().any(|t| t.is_empty() || !t.chars().all(is_tag_char)) {
            return (text, vec![]);
        }
        let tags = names.into_iter().map(Tag::from).collect();
        (text[..pos].trim_end(), tags)
    }

    /* --------------------------- Planning & Drawers --------------------------- */

    fn parse_planning_line(i: &str) -> PResult<'_, &str> {
        // e.g.: SCHEDULED: <2025-11-15 12:00> DEADLINE: <...>
        terminated(
            recognize(tuple((
                space0,
                alt((tag("SCHEDULED:"), tag("DEADLINE:"), tag("CLOSED:"))),
                not_line_ending,
            ))),
            opt(line_ending_ve),
        )(i)
    }

    fn parse_properties_drawer(i: &str) -> PResult<'_, PropertyDrawer> {
        // :PROPERTIES:\n :KEY: value\n ... \n:END:
        let (i, _) = tuple((space0, tag(":PROPERTIES:"), space0, line_ending_ve))(i)?;
        let mut drawer = PropertyDrawer::default();
        let mut rest = i;
        loop {
            if let Ok((r, _)) = tuple((space0, tag(":END:"), space0, opt(line_ending_ve)))(rest) {
                return Ok((r, drawer));
            }
            let (r, (k, v)) = parse_property_line(rest)?;
            drawer.set(k, v);
            rest = r;
        }
    }

    fn parse_property_line(i: &str) -> PResult<'_, (&str, &str)> {
        //  :KEY: value
        let (i, (_, _, key, _, _, value, _)) = tuple((
            space0,
            char(':'),
            take_while1(|c: char| c != ':' && !c.is_whitespace()),
            char(':'),
            space0,
            not_line_ending,
            opt(line_ending_ve),
        ))(i)?;
        Ok((i, (key, value.trim_end())))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn headline_with_tags() {
            let (_, h) = parse_headline("** Title with words :tag:other:\n").unwrap();
            assert_eq!(h.level, 2);
            assert_eq!(h.title, "Title with words");
            assert_eq!(h.tags, vec![Tag::from("tag"), Tag::from("other")]);
        }

        #[test]
        fn headline_colons_that_are_not_tags() {
            let (_, h) = parse_headline("* Meeting at 10:30\n").unwrap();
            assert_eq!(h.title, "Meeting at 10:30");
            assert!(h.tags.is_empty());
        }

        #[test]
        fn drawer_follows_planning() {
            let input = "* Task\nSCHEDULED: <2025-11-15>\n:PROPERTIES:\n:ID: abc\n:EMPTY:\n:END:\nBody\n";
            let file = parse_org_from_str(None, input).expect("parse");
            let h = &file.headings[0];
            assert_eq!(h.planning, vec!["SCHEDULED: <2025-11-15>".to_string()]);
            assert_eq!(h.properties.get("ID"), Some("abc"));
            assert_eq!(h.properties.get("EMPTY"), Some(""));
            assert_eq!(h.section.lines, vec!["Body".to_string()]);
        }

        #[test]
        fn unterminated_drawer_stays_in_section() {
            let input = "* Note\n:PROPERTIES:\nnot a property\n";
            let file = parse_org_from_str(None, input).expect("parse");
            let h = &file.headings[0];
            assert!(h.properties.is_empty());
            assert_eq!(h.section.lines.len(), 2);
        }

        #[test]
        fn nesting_by_level() {
            let input = "intro\n* A\n** B\n*** C\n** D\n* E\n";
            let file = parse_org_from_str(None, input).expect("parse");
            assert_eq!(file.preamble, vec!["intro".to_string()]);
            assert_eq!(file.headings.len(), 2);
            let a = &file.headings[0];
            assert_eq!(a.children.len(), 2);
            assert_eq!(a.children[0].children[0].title, "C");
            assert_eq!(a.children[1].title, "D");
            assert_eq!(file.headings[1].title, "E");
        }

        #[test]
        fn bold_text_is_not_a_heading() {
            let input = "* A\n*bold* line\n";
            let file = parse_org_from_str(None, input).expect("parse");
            assert_eq!(file.headings.len(), 1);
            assert_eq!(file.headings[0].section.lines, vec!["*bold* line".to_string()]);
        }
    }
}

pub mod format {
    use super::core::*;

    /// Render `file` as canonical Org text.
    pub fn format_org_file(file: &OrgFile) -> String {
        let mut out = String::new();

        for line in &file.preamble {
            out.push_str(line);
            out.push('\n');
        }

        for heading in &file.headings {
            format_heading(&mut out, heading);
        }

        out
    }

    fn format_heading(out: &mut String, heading: &Heading) {
        out.push_str(&render_headline(heading));

        for line in &heading.planning {
            out.push_str(line);
            out.push('\n');
        }

        if !heading.properties.is_empty() {
            out.push_str(&render_properties(&heading.properties));
        }

        for line in &heading.section.lines {
            out.push_str(line);
            out.push('\n');
        }

        for child in &heading.children {
            format_heading(out, child);
        }
    }

    fn render_headline(heading: &Heading) -> String {
        let mut buf = String::new();
        buf.push_str(&"*".repeat(heading.level as usize));
        buf.push(' ');
        buf.push_str(&heading.title);

        if !heading.tags.is_empty() {
            buf.push_str(" :");
            for tag in &heading.tags {
                buf.push_str(&tag.0);
                buf.push(':');
            }
        }
        buf.push('\n');
        buf
    }

    fn render_properties(props: &PropertyDrawer) -> String {
        let mut buf = String::new();
        buf.push_str(":PROPERTIES:\n");
        for (k, v) in &props.props {
            buf.push(':');
            buf.push_str(k);
            buf.push(':');
            if !v.is_empty() {
                buf.push(' ');
                buf.push_str(v);
            }
            buf.push('\n');
        }
        buf.push_str(":END:\n");
        buf
    }

}

pub mod outline {
    //! Structural queries and edits over an `OrgFile` tree, addressed by `HeadingPath`.

    use crate::core::*;

    impl OrgFile {
        pub fn heading(&self, path: &HeadingPath) -> Option<&Heading> {
            let (first, rest) = path.0.split_first()?;
            let mut node = self.headings.get(*first)?;
            for &i in rest {
                node = node.children.get(i)?;
            }
            Some(node)
        }

        pub fn heading_mut(&mut self, path: &HeadingPath) -> Option<&mut Heading> {
            let (first, rest) = path.0.split_first()?;
            let mut node = self.headings.get_mut(*first)?;
            for &i in rest {
                node = node.children.get_mut(i)?;
            }
            Some(node)
        }

        /// Children of `parent`, or the top-level headings for `None`.
        pub fn children(&self, parent: Option<&HeadingPath>) -> Option<&[Heading]> {
            match parent {
                None => Some(&self.headings),
                Some(p) => self.heading(p).map(|h| h.children.as_slice()),
            }
        }

        pub fn children_mut(&mut self, parent: Option<&HeadingPath>) -> Option<&mut Vec<Heading>> {
            match parent {
                None => Some(&mut self.headings),
                Some(p) => self.heading_mut(p).map(|h| &mut h.children),
            }
        }

        /// Insert `heading` as child `index` of `parent` (clamped to the end).
        pub fn insert_heading(
            &mut self,
            parent: Option<&HeadingPath>,
            index: usize,
            heading: Heading,
        ) -> Result<HeadingPath, DomainError> {
            let siblings = self
                .children_mut(parent)
                .ok_or_else(|| missing(parent))?;
            let index = index.min(siblings.len());
            siblings.insert(index, heading);
            Ok(HeadingPath::under(parent, index))
        }

        /// Remove the subtree rooted at `path`.
        pub fn remove_heading(&mut self, path: &HeadingPath) -> Result<Heading, DomainError> {
            let parent = path.parent();
            let index = path.index();
            let siblings = self
                .children_mut(parent.as_ref())
                .filter(|s| index < s.len())
                .ok_or_else(|| DomainError::NoSuchHeading(path.clone()))?;
            Ok(siblings.remove(index))
        }

        /// First heading in document order whose property `key` equals `value`.
        pub fn find_by_property(&self, key: &str, value: &str) -> Option<HeadingPath> {
            fn rec(
                headings: &[Heading],
                prefix: &mut Vec<usize>,
                key: &str,
                value: &str,
            ) -> Option<HeadingPath> {
                for (i, h) in headings.iter().enumerate() {
                    prefix.push(i);
                    if h.properties.get(key) == Some(value) {
                        return Some(HeadingPath(prefix.clone()));
                    }
                    if let Some(hit) = rec(&h.children, prefix, key, value) {
                        return Some(hit);
                    }
                    prefix.pop();
                }
                None
            }
            rec(&self.headings, &mut Vec::new(), key, value)
        }

        /// Resolve an outline path of exact heading titles, starting at the top level.
        pub fn find_olp(&self, olp: &[String]) -> Option<HeadingPath> {
            let mut path: Option<HeadingPath> = None;
            for title in olp {
                let siblings = self.children(path.as_ref())?;
                let idx = siblings.iter().position(|h| &h.title == title)?;
                path = Some(HeadingPath::under(path.as_ref(), idx));
            }
            path
        }

        /// Like `find_olp`, but appends any missing headings (levels 1..=n).
        pub fn ensure_olp(&mut self, olp: &[String]) -> Result<Option<HeadingPath>, DomainError> {
            let mut path: Option<HeadingPath> = None;
            for (depth, title) in olp.iter().enumerate() {
                let siblings = self.children(path.as_ref()).ok_or_else(|| missing(path.as_ref()))?;
                let next = match siblings.iter().position(|h| &h.title == title) {
                    Some(idx) => HeadingPath::under(path.as_ref(), idx),
                    None => {
                        let level = u8::try_from(depth + 1).unwrap_or(u8::MAX);
                        let end = siblings.len();
                        self.insert_heading(path.as_ref(), end, Heading::new(level, title.clone()))?
                    }
                };
                path = Some(next);
            }
            Ok(path)
        }
    }

    impl Heading {
        /// Whether anything beyond the headline itself is present: planning lines, a
        /// non-empty property drawer, or non-blank section text. Children do not count.
        pub fn has_contents(&self) -> bool {
            !self.planning.is_empty() || !self.properties.is_empty() || self.section.has_text()
        }
    }

    fn missing(parent: Option<&HeadingPath>) -> DomainError {
        DomainError::NoSuchHeading(parent.cloned().unwrap_or(HeadingPath(vec![])))
    }

    #[cfg(test)]
    mod tests {
        use crate::core::*;
        use crate::parse_org_from_str;

        const DOC: &str = "* Inbox\n** One\n:PROPERTIES:\n:KEY: a\n:END:\n* Journal\n** Two\n:PROPERTIES:\n:KEY: b\n:END:\n";

        #[test]
        fn find_by_property_returns_document_order_path() {
            let file = parse_org_from_str(None, DOC).expect("parse");
            assert_eq!(file.find_by_property("KEY", "b"), Some(HeadingPath(vec![1, 0])));
            assert_eq!(file.find_by_property("KEY", "zzz"), None);
        }

        #[test]
        fn remove_drops_whole_subtree() {
            let mut file = parse_org_from_str(None, DOC).expect("parse");
            let removed = file.remove_heading(&HeadingPath::top(0)).expect("remove");
            assert_eq!(removed.title, "Inbox");
            assert_eq!(file.headings.len(), 1);
            assert!(file.find_by_property("KEY", "a").is_none());
            assert!(file.remove_heading(&HeadingPath(vec![5])).is_err());
        }

        #[test]
        fn olp_lookup_and_creation() {
            let mut file = parse_org_from_str(None, DOC).expect("parse");
            let olp = vec!["Journal".to_string(), "Two".to_string()];
            assert_eq!(file.find_olp(&olp), Some(HeadingPath(vec![1, 0])));

            let fresh = vec!["Archive".to_string(), "2020".to_string()];
            assert!(file.find_olp(&fresh).is_none());
            let created = file.ensure_olp(&fresh).expect("ensure").expect("path");
            assert_eq!(created, HeadingPath(vec![2, 0]));
            assert_eq!(file.heading(&created).map(|h| h.level), Some(2));
        }

        #[test]
        fn contents_ignore_children_and_whitespace() {
            let mut h = Heading::new(1, "Day");
            h.section.lines.push("   ".into());
            h.children.push(Heading::new(2, "Child"));
            assert!(!h.has_contents());
            h.properties.set("K", "v");
            assert!(h.has_contents());
        }
    }
}

pub mod datetree {
    //! Year → month → day heading hierarchy, kept in chronological order.
    //!
    //! Headings follow the usual Org datetree naming: `2024`, `2024-03 March`,
    //! `2024-03-15 Friday`.

    use crate::core::*;
    use chrono::{DateTime, Datelike, NaiveDate};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Unit {
        Year,
        Month,
        Day,
    }

    type Key = (i32, u32, u32);

    impl Unit {
        fn title(self, date: NaiveDate) -> String {
            match self {
                Unit::Year => date.format("%Y").to_string(),
                Unit::Month => date.format("%Y-%m %B").to_string(),
                Unit::Day => date.format("%Y-%m-%d %A").to_string(),
            }
        }

        fn key(self, date: NaiveDate) -> Key {
            match self {
                Unit::Year => (date.year(), 0, 0),
                Unit::Month => (date.year(), date.month(), 0),
                Unit::Day => (date.year(), date.month(), date.day()),
            }
        }

        /// Leading date key of an existing heading title, if it has one.
        fn key_of(self, title: &str) -> Option<Key> {
            let width = match self {
                Unit::Year => 4,
                Unit::Month => 7,
                Unit::Day => 10,
            };
            let head = title.get(..width)?;
            if title[width..].chars().next().is_some_and(|c| !c.is_whitespace()) {
                return None;
            }
            let date = match self {
                Unit::Year => NaiveDate::parse_from_str(&format!("{head}-01-01"), "%Y-%m-%d"),
                Unit::Month => NaiveDate::parse_from_str(&format!("{head}-01"), "%Y-%m-%d"),
                Unit::Day => NaiveDate::parse_from_str(head, "%Y-%m-%d"),
            }
            .ok()?;
            Some(self.key(date))
        }
    }

    /// Calendar date of an ISO-8601 timestamp, taken from its nominal components.
    /// The offset is not applied: `2024-03-15T23:30:00-05:00` buckets on the 15th.
    pub fn parse_entry_date(value: &str) -> Result<NaiveDate, DomainError> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(dt.naive_local().date());
        }
        value
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(|| DomainError::InvalidDate(value.to_string()))
    }

    /// Locate or create the day heading for `date` and return a position ready for content.
    ///
    /// `anchor` nests the tree below an outline path; in a new document missing anchor
    /// headings are created, otherwise they must already exist. When the day heading is
    /// already occupied a sibling titled `<day> (<disambiguator>)` is inserted after the
    /// existing same-day siblings and returned instead.
    pub fn find_or_create_entry(
        file: &mut OrgFile,
        date: NaiveDate,
        anchor: Option<&[String]>,
        is_new: bool,
        disambiguator: &str,
    ) -> Result<HeadingPath, DomainError> {
        let root = match anchor {
            None | Some([]) => None,
            Some(olp) => match file.find_olp(olp) {
                Some(path) => Some(path),
                None if is_new => file.ensure_olp(olp)?,
                None => return Err(DomainError::AnchorNotFound(olp.to_vec())),
            },
        };
        let base_level = match &root {
            Some(path) => file
                .heading(path)
                .map(|h| h.level)
                .ok_or_else(|| DomainError::NoSuchHeading(path.clone()))?,
            None => 0,
        };

        let (year, _) = find_or_create_unit(file, root.as_ref(), base_level + 1, Unit::Year, date)?;
        let (month, _) = find_or_create_unit(file, Some(&year), base_level + 2, Unit::Month, date)?;
        let (day, created) = find_or_create_unit(file, Some(&month), base_level + 3, Unit::Day, date)?;

        // A heading created just now is empty; skip the scan.
        if created {
            return Ok(day);
        }
        let existing = file
            .heading(&day)
            .ok_or_else(|| DomainError::NoSuchHeading(day.clone()))?;
        if !existing.has_contents() {
            return Ok(day);
        }

        let title = format!("{} ({})", existing.title, disambiguator);
        let run_prefix = format!("{} (", existing.title);
        let level = existing.level;
        let siblings = file
            .children(Some(&month))
            .ok_or_else(|| DomainError::NoSuchHeading(month.clone()))?;
        let mut at = day.index() + 1;
        while siblings.get(at).is_some_and(|h| h.title.starts_with(&run_prefix)) {
            at += 1;
        }
        file.insert_heading(Some(&month), at, Heading::new(level, title))
    }

    /// Clear a previously imported entry so it can be rewritten in its slot.
    ///
    /// The subtree at `path` is removed. When it was filed under `date` (its title is the
    /// day title, possibly with a ` (...)` suffix) an empty heading with the same level and
    /// title takes its place and its position is returned. Otherwise `None`: the entry has
    /// moved day and must be placed with [`find_or_create_entry`].
    pub fn reset_entry(
        file: &mut OrgFile,
        path: &HeadingPath,
        date: NaiveDate,
    ) -> Result<Option<HeadingPath>, DomainError> {
        let removed = file.remove_heading(path)?;
        let day = Unit::Day.title(date);
        let same_day = removed.title == day
            || removed
                .title
                .strip_prefix(day.as_str())
                .is_some_and(|rest| rest.starts_with(" ("));
        if !same_day {
            return Ok(None);
        }
        let parent = path.parent();
        let slot = Heading::new(removed.level, removed.title);
        file.insert_heading(parent.as_ref(), path.index(), slot).map(Some)
    }

    fn find_or_create_unit(
        file: &mut OrgFile,
        parent: Option<&HeadingPath>,
        level: u8,
        unit: Unit,
        date: NaiveDate,
    ) -> Result<(HeadingPath, bool), DomainError> {
        let title = unit.title(date);
        let key = unit.key(date);
        let siblings = file
            .children(parent)
            .ok_or_else(|| DomainError::NoSuchHeading(parent.cloned().unwrap_or(HeadingPath(vec![]))))?;

        if let Some(idx) = siblings.iter().position(|h| h.title == title) {
            return Ok((HeadingPath::under(parent, idx), false));
        }

        let at = siblings
            .iter()
            .position(|h| unit.key_of(&h.title).is_some_and(|k| k >= key))
            .unwrap_or(siblings.len());
        let path = file.insert_heading(parent, at, Heading::new(level, title))?;
        Ok((path, true))
    }

}

pub use format::format_org_file;
pub use parser::{NomOrgParser, parse_org_from_str};
