//! Four-step story seed picker: who, what, where and when.

use log::debug;

const WHO_OPTIONS: &[&str] = &[
    "Alice the Adventurer",
    "Buzz the Bee",
    "Charlie the Chimp",
    "Daisy the Dinosaur",
    "Ella the Explorer",
    "Frank the Firefighter",
    "Grace the Gardener",
    "Henry the Hunter",
    "Ivy the Inventor",
    "Jack the Juggler",
    "Katie the Knight",
    "Leo the Lumberjack",
    "Mia the Magician",
    "Noah the Navigator",
    "Olivia the Olympian",
    "Peter the Pilot",
    "Quinn the Quizmaster",
    "Ruby the Rockstar",
    "Sam the Scientist",
    "Tessa the Teacher",
    "Uma the Urban Farmer",
    "Victor the Veterinarian",
    "Willow the Writer",
    "Xavier the Xylophonist",
    "Yara the Yoga Instructor",
    "Zoe the Zookeeper",
];

const WHAT_OPTIONS: &[&str] = &[
    "Admiring Art",
    "Building a Sandcastle",
    "Catching Butterflies",
    "Digging for Dinosaurs",
];

const WHERE_OPTIONS: &[&str] = &[
    "At the Amusement Park",
    "By the Beach",
    "In the Clouds",
    "Deep in the Jungle",
];

const WHEN_OPTIONS: &[&str] = &[
    "During a Full Moon",
    "At the Break of Dawn",
    "When Dinosaurs Roamed",
    "In the Future",
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuilderStep {
    Who,
    What,
    Where,
    When,
}

impl BuilderStep {
    pub const ALL: [Self; 4] = [Self::Who, Self::What, Self::Where, Self::When];

    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Who => "Who is going with you?",
            Self::What => "What are you doing?",
            Self::Where => "Where are you going?",
            Self::When => "When are you going?",
        }
    }

    pub const fn options(self) -> &'static [&'static str] {
        match self {
            Self::Who => WHO_OPTIONS,
            Self::What => WHAT_OPTIONS,
            Self::Where => WHERE_OPTIONS,
            Self::When => WHEN_OPTIONS,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Who => 0,
            Self::What => 1,
            Self::Where => 2,
            Self::When => 3,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Who => Some(Self::What),
            Self::What => Some(Self::Where),
            Self::Where => Some(Self::When),
            Self::When => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Who => None,
            Self::What => Some(Self::Who),
            Self::Where => Some(Self::What),
            Self::When => Some(Self::Where),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Choice {
    Listed(&'static str),
    Custom(String),
}

impl Choice {
    fn as_str(&self) -> &str {
        match self {
            Self::Listed(value) => value,
            Self::Custom(value) => value,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoryBuilder {
    step: BuilderStep,
    choices: [Option<Choice>; 4],
}

impl Default for StoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryBuilder {
    pub const fn new() -> Self {
        Self {
            step: BuilderStep::Who,
            choices: [None, None, None, None],
        }
    }

    pub fn step(&self) -> BuilderStep {
        self.step
    }

    /// Tap option `index` of the current step. Tapping the chosen value again
    /// clears it. Returns whether the step now has a selection.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(value) = self.step.options().get(index).copied() else {
            return self.selection(self.step).is_some();
        };

        let slot = &mut self.choices[self.step.index()];
        if matches!(slot, Some(Choice::Listed(current)) if *current == value) {
            *slot = None;
            debug!("builder: {:?} cleared", self.step);
            return false;
        }

        *slot = Some(Choice::Listed(value));
        debug!("builder: {:?} = {:?}", self.step, value);
        true
    }

    /// Use a free-form value for the current step. Blank input is ignored.
    pub fn select_custom(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        self.choices[self.step.index()] = Some(Choice::Custom(value.to_owned()));
        debug!("builder: {:?} = custom {:?}", self.step, value);
        true
    }

    pub fn clear(&mut self) {
        self.step = BuilderStep::Who;
        self.choices = [None, None, None, None];
    }

    pub fn next_step(&mut self) -> bool {
        match self.step.next() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn previous_step(&mut self) -> bool {
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn selection(&self, step: BuilderStep) -> Option<&str> {
        self.choices[step.index()].as_ref().map(Choice::as_str)
    }

    pub fn is_complete(&self) -> bool {
        self.choices.iter().all(Option::is_some)
    }

    /// One-line story seed, once every step has a value.
    pub fn summary(&self) -> Option<String> {
        let [who, what, place, when] = BuilderStep::ALL.map(|step| self.selection(step));
        Some(format!(
            "{} is {} {}, {}.",
            who?,
            what?.to_lowercase(),
            place?.to_lowercase(),
            when?.to_lowercase()
        ))
    }
}
