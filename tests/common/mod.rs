// Content types shared by the integration tests.
#![allow(dead_code)]

use std::cmp::Ordering;
use std::fmt;

use quizgen::content::{Answer, Identity, PuzzleQuestion, Question, QuizQuestion, Tile};

/// An answer on a number line. Answers one unit apart have similarity 0.
#[derive(Debug, Clone)]
pub struct Point {
    pub label: &'static str,
    pub at: f64,
}

pub fn point(label: &'static str, at: f64) -> Point {
    Point { label, at }
}

impl Identity for Point {
    fn is_same_as(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

impl Answer for Point {
    fn similarity(&self, other: &Self) -> f64 {
        (1.0 - (self.at - other.at).abs()).max(0.0)
    }

    fn sort_order(&self, other: &Self) -> Ordering {
        self.label.cmp(other.label)
    }
}

#[derive(Debug, Clone)]
pub struct Trivia {
    pub text: &'static str,
    pub group: &'static str,
    pub difficulty: f64,
    pub correct: Vec<&'static str>,
    pub surfaced: Vec<Point>,
    pub num_answers: usize,
    pub required: usize,
    pub maximum: usize,
    pub max_similarity: f64,
}

impl Trivia {
    pub fn new(text: &'static str, difficulty: f64, correct: &[&'static str]) -> Self {
        Self {
            text,
            group: "trivia",
            difficulty,
            correct: correct.to_vec(),
            surfaced: Vec::new(),
            num_answers: 4,
            required: 1,
            maximum: 1,
            max_similarity: 0.3,
        }
    }
}

impl Identity for Trivia {
    fn is_same_as(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl Question for Trivia {
    type Answer = Point;

    fn group(&self) -> &str {
        self.group
    }

    fn difficulty(&self) -> f64 {
        self.difficulty
    }

    fn make_answers(&self) -> Vec<Point> {
        self.surfaced.clone()
    }

    fn num_answers(&self) -> usize {
        self.num_answers
    }

    fn max_similarity(&self) -> f64 {
        self.max_similarity
    }
}

impl QuizQuestion for Trivia {
    fn is_correct_answer(&self, answer: &Point) -> bool {
        self.correct.contains(&answer.label)
    }

    fn required_correct_answers(&self) -> usize {
        self.required
    }

    fn maximum_correct_answers(&self) -> usize {
        self.maximum
    }
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub name: &'static str,
    pub fits: &'static str,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Tile<Point> for Slot {
    fn is_correct_answer(&self, answer: &Point) -> bool {
        answer.label == self.fits
    }

    fn center_x(&self) -> f64 {
        0.5
    }

    fn center_y(&self) -> f64 {
        0.5
    }

    fn width(&self) -> f64 {
        0.25
    }

    fn height(&self) -> f64 {
        0.25
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pub name: &'static str,
    pub slots: Vec<Slot>,
    pub surfaced: Vec<Point>,
}

impl Identity for Board {
    fn is_same_as(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Question for Board {
    type Answer = Point;

    fn group(&self) -> &str {
        "boards"
    }

    fn difficulty(&self) -> f64 {
        0.0
    }

    fn make_answers(&self) -> Vec<Point> {
        self.surfaced.clone()
    }

    fn num_answers(&self) -> usize {
        self.slots.len()
    }

    fn max_similarity(&self) -> f64 {
        0.5
    }
}

impl PuzzleQuestion for Board {
    type Tile = Slot;

    fn tiles(&self) -> Vec<Slot> {
        self.slots.clone()
    }
}
