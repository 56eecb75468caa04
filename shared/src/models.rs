use std::fmt;

/// One of the two fixed choices. The label doubles as the counter's store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteOption(String);

impl VoteOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOptions {
    pub first: VoteOption,
    pub second: VoteOption,
}

impl VoteOptions {
    pub fn new(first: VoteOption, second: VoteOption) -> Self {
        Self { first, second }
    }

    pub fn iter(&self) -> impl Iterator<Item = &VoteOption> {
        [&self.first, &self.second].into_iter()
    }

    pub fn find(&self, key: &str) -> Option<&VoteOption> {
        self.iter().find(|option| option.key() == key)
    }

    pub fn keys(&self) -> [&str; 2] {
        [self.first.key(), self.second.key()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub option: VoteOption,
    pub count: u64,
}

impl Tally {
    pub fn new(option: VoteOption, count: u64) -> Self {
        Self { option, count }
    }
}

/// Everything the page needs for one response. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub title: String,
    pub first: Tally,
    pub second: Tally,
}

impl PageContext {
    pub fn new(title: impl Into<String>, first: Tally, second: Tally) -> Self {
        Self {
            title: title.into(),
            first,
            second,
        }
    }

    pub fn zeroed(title: impl Into<String>, options: &VoteOptions) -> Self {
        Self::new(
            title,
            Tally::new(options.first.clone(), 0),
            Tally::new(options.second.clone(), 0),
        )
    }

    pub fn tallies(&self) -> [&Tally; 2] {
        [&self.first, &self.second]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteAction {
    Reset,
    Increment(VoteOption),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "backend", derive(rocket::FromForm))]
pub struct VoteForm {
    pub vote: Option<String>,
}
