//! Host loop: feeds host frames through the session and writes core
//! messages back as JSON lines.

use std::io::Write;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::feed::{self, Control, CoreMsg, Drained, FrameInput, HostMsg, Inbox};
use crate::store::{ScoreRecord, ScoreRecorder};
use crate::util::time::{tick_delta, tick_period, Timer};

use super::session::{GameSession, GameSummary, StepOutput};
use super::SessionError;

/// How the driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSummary {
    pub ticks: u64,
    pub games_over: u32,
    pub faults: u32,
}

/// Runs a session against a host feed
pub struct Driver<W: Write> {
    session: GameSession,
    inbox: Inbox,
    out: W,
    recorder: Box<dyn ScoreRecorder>,
    realtime: bool,
    /// Snapshot reused until the host sends a newer one
    last_frame: FrameInput,
    summary: DriverSummary,
}

impl<W: Write> Driver<W> {
    pub fn new(
        session: GameSession,
        inbox: Inbox,
        out: W,
        recorder: Box<dyn ScoreRecorder>,
        realtime: bool,
    ) -> Self {
        Self {
            session,
            inbox,
            out,
            recorder,
            realtime,
            last_frame: FrameInput::default(),
            summary: DriverSummary {
                ticks: 0,
                games_over: 0,
                faults: 0,
            },
        }
    }

    /// Run until the host exits or hangs up
    pub async fn run(mut self) -> std::io::Result<DriverSummary> {
        info!(session_id = %self.session.id(), realtime = self.realtime, "Driver started");

        if self.realtime {
            self.run_paced().await?;
        } else {
            self.run_lockstep().await?;
        }

        info!(
            session_id = %self.session.id(),
            ticks = self.summary.ticks,
            games_over = self.summary.games_over,
            "Driver stopped"
        );
        Ok(self.summary)
    }

    /// Fixed-rate ticks; whatever arrived in between is coalesced
    async fn run_paced(&mut self) -> std::io::Result<()> {
        let mut tick_interval = interval(tick_period());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tick_interval.tick().await;

            let Drained {
                frame,
                controls,
                closed,
            } = self.inbox.drain();
            if let Some(frame) = frame {
                self.last_frame = frame;
            }
            if self.apply_controls(&controls) {
                break;
            }

            self.tick()?;

            if closed {
                info!(session_id = %self.session.id(), "Host feed closed");
                break;
            }
        }
        Ok(())
    }

    /// One tick per host frame; used for replays and tests
    async fn run_lockstep(&mut self) -> std::io::Result<()> {
        while let Some(msg) = self.inbox.recv().await {
            let control = match msg {
                HostMsg::Frame(frame) => {
                    self.last_frame = frame;
                    self.tick()?;
                    continue;
                }
                HostMsg::Pause => Control::Pause,
                HostMsg::Resume => Control::Resume,
                HostMsg::Restart => Control::Restart,
                HostMsg::Exit => Control::Exit,
            };
            if self.apply_controls(&[control]) {
                return Ok(());
            }
        }
        info!(session_id = %self.session.id(), "Host feed closed");
        Ok(())
    }

    /// Returns true when the host asked to exit
    fn apply_controls(&mut self, controls: &[Control]) -> bool {
        for control in controls {
            match control {
                Control::Pause => self.session.pause(),
                Control::Resume => self.session.resume(),
                Control::Restart => {
                    self.session.restart();
                    self.last_frame = FrameInput::default();
                }
                Control::Exit => {
                    info!(session_id = %self.session.id(), "Exit requested");
                    return true;
                }
            }
        }
        false
    }

    fn tick(&mut self) -> std::io::Result<()> {
        let timer = Timer::new();
        match self.session.step(&self.last_frame, tick_delta()) {
            Ok(StepOutput {
                frame,
                events,
                game_over,
            }) => {
                self.summary.ticks += 1;
                self.send(&CoreMsg::frame(frame, events))?;
                if let Some(summary) = game_over {
                    self.finish_game(summary)?;
                }
            }
            Err(SessionError::SessionTerminated) => {}
            Err(e) => {
                self.summary.faults += 1;
                self.send(&CoreMsg::Fault {
                    message: e.to_string(),
                })?;
            }
        }
        debug!(micros = timer.elapsed_micros(), "Tick done");
        Ok(())
    }

    fn finish_game(&mut self, summary: GameSummary) -> std::io::Result<()> {
        self.summary.games_over += 1;
        let record = ScoreRecord {
            session_id: self.session.id(),
            game: self.session.game(),
            mode: self.session.mode(),
            final_score: summary.final_score,
            level: summary.level,
            recorded_at: Utc::now(),
        };
        info!(
            session_id = %record.session_id,
            score = record.final_score,
            level = record.level,
            ticks = summary.ticks,
            "Game over"
        );

        let recorded = match self.recorder.record_score(&record) {
            Ok(ack) => {
                if ack.new_best {
                    info!(session_id = %record.session_id, best = ack.best, "New best score");
                }
                true
            }
            Err(e) => {
                warn!(session_id = %record.session_id, error = %e, "Failed to record score");
                false
            }
        };

        self.send(&CoreMsg::GameOver {
            session_id: record.session_id,
            game: record.game,
            mode: record.mode,
            final_score: record.final_score,
            level: record.level,
            recorded,
        })
    }

    fn send(&mut self, msg: &CoreMsg) -> std::io::Result<()> {
        match feed::encode(msg) {
            Ok(line) => {
                writeln!(self.out, "{}", line)?;
                self.out.flush()
            }
            Err(e) => {
                error!(error = %e, "Failed to encode core message");
                Ok(())
            }
        }
    }
}
