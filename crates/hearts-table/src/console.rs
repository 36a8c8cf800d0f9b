use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use hearts_bot::Policy;
use hearts_core::model::card::Card;
use hearts_core::model::player::PlayerId;
use hearts_core::protocol::{Notification, TurnRequest};
use tracing::{Level, event};

/// A human seat driven through line-based text I/O.
///
/// Each request lists the legal cards with 1-based numbers. The player answers
/// with a number or a card code such as `QS` or `10H`; anything else is
/// rejected and the prompt repeats. End of input gives up the seat.
pub struct ConsolePolicy<R, W> {
    name: String,
    roster: Vec<(PlayerId, String)>,
    input: R,
    output: W,
}

impl ConsolePolicy<BufReader<Stdin>, Stdout> {
    pub fn stdio(name: impl Into<String>) -> Self {
        Self::new(name, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> ConsolePolicy<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            roster: Vec::new(),
            input,
            output,
        }
    }

    /// Names shown instead of raw player ids.
    pub fn set_roster(&mut self, roster: Vec<(PlayerId, String)>) {
        self.roster = roster;
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn label(&self, id: PlayerId) -> String {
        self.roster
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map_or_else(|| id.to_string(), |(_, name)| name.clone())
    }

    fn prompt(&mut self, request: &TurnRequest) -> io::Result<Option<Card>> {
        let table = if request.cards_played.is_empty() {
            "You lead.".to_string()
        } else {
            request
                .cards_played
                .iter()
                .map(|play| format!("{} played {}", self.label(play.player), play.card))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(self.output, "\n{}: {table}", self.name)?;
        for (idx, card) in request.legal_cards.iter().enumerate() {
            writeln!(self.output, "  {}) {card}", idx + 1)?;
        }

        let mut line = String::new();
        loop {
            write!(self.output, "Choose a card [1-{}]: ", request.legal_cards.len())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_choice(line.trim(), &request.legal_cards) {
                Some(card) => return Ok(Some(card)),
                None => writeln!(
                    self.output,
                    "'{}' is not one of the listed cards.",
                    line.trim()
                )?,
            }
        }
    }

    fn announce(&mut self, notification: &Notification) -> io::Result<()> {
        match notification {
            Notification::TrickCompleted(summary) => {
                let cards = summary
                    .plays
                    .iter()
                    .map(|play| play.card.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(
                    self.output,
                    "Trick {}: [{cards}] taken by {} for {} point{}",
                    summary.number,
                    self.label(summary.winner),
                    summary.points,
                    if summary.points == 1 { "" } else { "s" }
                )?;
            }
            Notification::RoundCompleted(summary) => {
                writeln!(self.output, "Round {} complete.", summary.number)?;
                if let Some(shooter) = summary.score.moon_shooter {
                    writeln!(self.output, "{} shot the moon!", self.label(shooter))?;
                }
                for &(id, score) in &summary.standings {
                    writeln!(
                        self.output,
                        "  {:<12} +{:<3} total {score}",
                        self.label(id),
                        summary.score.awarded_to(id)
                    )?;
                }
            }
            Notification::DealFailed(err) => {
                writeln!(self.output, "The next round could not be dealt: {err}")?;
            }
            Notification::GameCompleted => writeln!(self.output, "Game over.")?,
            Notification::TurnRequested(_) => {}
        }
        Ok(())
    }
}

impl<R: BufRead + Send, W: Write + Send> Policy for ConsolePolicy<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_play(&mut self, request: &TurnRequest) -> Option<Card> {
        match self.prompt(request) {
            Ok(choice) => choice,
            Err(err) => {
                event!(target: "hearts_table::console", Level::WARN, error = %err, "console input failed");
                None
            }
        }
    }

    fn observe(&mut self, notification: &Notification) {
        if let Err(err) = self.announce(notification) {
            event!(target: "hearts_table::console", Level::WARN, error = %err, "console output failed");
        }
    }
}

/// Accepts a 1-based index into `legal` or a card code, case-insensitive.
fn parse_choice(raw: &str, legal: &[Card]) -> Option<Card> {
    if let Ok(index) = raw.parse::<usize>() {
        return index.checked_sub(1).and_then(|idx| legal.get(idx)).copied();
    }
    raw.parse::<Card>().ok().filter(|card| legal.contains(card))
}
