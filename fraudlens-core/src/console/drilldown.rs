//! Time series drill-down: the selected video, its likes series, and the
//! mapping from a chart point to an hour bucket.

use crate::error::{Error, Result};
use crate::types::{HourBucket, LikesSeries, Video};

use super::effects::Request;
use super::ticket::{Ticket, TicketCounter};

/// Load state of the selected video's series.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SeriesState {
    /// No video selected yet
    #[default]
    Idle,
    Loading,
    Ready(LikesSeries),
    Failed,
}

/// Result of resolving a chart click to an hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourSelection {
    /// Chart label as shown, `"YYYY-MM-DD HH:00"`
    pub label: String,
    /// Bucket sent to the backend, `"YYYY-MM-DD HH"`
    pub bucket: HourBucket,
    /// Title of the video the hour belongs to
    pub video_title: String,
    pub request: Request,
}

/// Pick the video to show on first load: `preferred` if the list has it,
/// otherwise the first video.
pub fn default_video(videos: &[Video], preferred: i64) -> Option<i64> {
    videos
        .iter()
        .find(|v| v.id == preferred)
        .or_else(|| videos.first())
        .map(|v| v.id)
}

/// Map a horizontal click offset inside a plot of width `extent` onto one of
/// `count` evenly spaced points.
///
/// The first point sits on the left edge and the last on the right edge.
/// Offsets outside the plot resolve to nothing.
pub fn resolve_point(offset: u16, extent: u16, count: usize) -> Option<usize> {
    if count == 0 || extent == 0 || offset >= extent {
        return None;
    }
    if count == 1 || extent == 1 {
        return Some(0);
    }
    let span = (count - 1) as f64;
    let position = offset as f64 / (extent - 1) as f64;
    Some(((position * span).round() as usize).min(count - 1))
}

/// Owns the video list, the current selection and its series.
#[derive(Debug, Default)]
pub struct TimeSeriesDrillDown {
    videos: Vec<Video>,
    videos_loaded: bool,
    selected: Option<i64>,
    series: SeriesState,
    /// Keyboard position over the series points
    cursor: usize,
    series_tickets: TicketCounter,
    activity_tickets: TicketCounter,
}

impl TimeSeriesDrillDown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn videos_loaded(&self) -> bool {
        self.videos_loaded
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    pub fn selected_video(&self) -> Option<&Video> {
        let id = self.selected?;
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn series(&self) -> &SeriesState {
        &self.series
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Store the video list and select the default video.
    pub fn on_videos_loaded(&mut self, videos: Vec<Video>, preferred: i64) -> Option<Request> {
        self.videos = videos;
        self.videos_loaded = true;
        let id = default_video(&self.videos, preferred)?;
        tracing::info!(video_id = id, count = self.videos.len(), "Selecting default video");
        self.select_video(id).ok()
    }

    /// Make `id` the current video and request its series.
    ///
    /// Any series already shown is cleared right away; responses for the
    /// previous selection will be discarded.
    pub fn select_video(&mut self, id: i64) -> Result<Request> {
        if !self.videos.iter().any(|v| v.id == id) {
            return Err(Error::VideoNotFound(id));
        }
        self.selected = Some(id);
        self.series = SeriesState::Loading;
        self.cursor = 0;
        let ticket = self.series_tickets.issue();
        Ok(Request::LikesSeries {
            ticket,
            video_id: id,
        })
    }

    /// Apply a series response if it still belongs to the current selection.
    ///
    /// Returns whether the response was applied.
    pub fn on_series_loaded(
        &mut self,
        ticket: Ticket,
        video_id: i64,
        result: Result<LikesSeries>,
    ) -> bool {
        if !self.series_tickets.is_latest(ticket) || self.selected != Some(video_id) {
            tracing::debug!(%ticket, video_id, "Discarding stale likes series");
            return false;
        }
        match result {
            Ok(series) => {
                self.cursor = peak_index(&series);
                self.series = SeriesState::Ready(series);
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Failed to load likes series");
                self.series = SeriesState::Failed;
            }
        }
        true
    }

    /// Move the keyboard cursor by `delta` points, clamped to the series.
    pub fn move_cursor(&mut self, delta: isize) {
        if let SeriesState::Ready(series) = &self.series {
            let last = series.len().saturating_sub(1);
            self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        }
    }

    pub fn cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_end(&mut self) {
        if let SeriesState::Ready(series) = &self.series {
            self.cursor = series.len().saturating_sub(1);
        }
    }

    /// Resolve a click on point `index` to its hour and request the activity.
    pub fn handle_click(&mut self, index: usize) -> Result<HourSelection> {
        let video = self
            .selected_video()
            .ok_or(Error::NoSelection("video"))?;
        let video_id = video.id;
        let video_title = video.title.clone();

        let SeriesState::Ready(series) = &self.series else {
            return Err(Error::NoSelection("likes series"));
        };
        let label = series
            .labels
            .get(index)
            .cloned()
            .ok_or(Error::PointOutOfRange {
                index,
                len: series.len(),
            })?;

        let bucket = HourBucket::from_label(&label);
        self.cursor = index;
        let ticket = self.activity_tickets.issue();
        tracing::info!(video_id, hour = %bucket, %ticket, "Drilling into hour");

        Ok(HourSelection {
            request: Request::HourActivity {
                ticket,
                video_id,
                hour: bucket.clone(),
            },
            label,
            bucket,
            video_title,
        })
    }

    /// Whether an activity response is for the hour currently open.
    pub fn accepts_activity(&self, ticket: Ticket) -> bool {
        self.activity_tickets.is_latest(ticket)
    }

    /// Forget the open hour so a late activity response is ignored.
    pub fn release_hour(&mut self) {
        self.activity_tickets.invalidate();
    }
}

/// Index of the busiest hour, first one on ties.
fn peak_index(series: &LikesSeries) -> usize {
    series
        .data
        .iter()
        .enumerate()
        .fold((0, i64::MIN), |best, (i, &count)| {
            if count > best.1 {
                (i, count)
            } else {
                best
            }
        })
        .0
}
