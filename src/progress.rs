use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    /// Target exceeded; nothing to animate.
    Complete,
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub current: u64,
    pub target: u64,
    pub percent: u64,
    pub state: ProgressState,
}

impl ProgressReport {
    /// A fresh `0..=percent` sequence on every call; empty once complete.
    pub fn steps(&self) -> ProgressSteps {
        match self.state {
            ProgressState::Complete => ProgressSteps::empty(),
            ProgressState::Animating => ProgressSteps::new(self.percent),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state == ProgressState::Complete
    }
}

pub fn track(current: u64, target: u64) -> Result<ProgressReport, DashboardError> {
    if target == 0 {
        return Err(DashboardError::InvalidTarget(target));
    }

    let percent = rounded_percent(current, target);
    let state = if percent > 100 {
        ProgressState::Complete
    } else {
        ProgressState::Animating
    };

    Ok(ProgressReport {
        current,
        target,
        percent,
        state,
    })
}

/// `round(current / target * 100)` with halves rounded up.
fn rounded_percent(current: u64, target: u64) -> u64 {
    let (current, target) = (u128::from(current), u128::from(target));
    let percent = (current * 200 + target) / (target * 2);
    u64::try_from(percent).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone)]
pub struct ProgressSteps {
    next: u64,
    end: u64,
    exhausted: bool,
}

impl ProgressSteps {
    fn new(end: u64) -> Self {
        Self {
            next: 0,
            end,
            exhausted: false,
        }
    }

    fn empty() -> Self {
        Self {
            next: 0,
            end: 0,
            exhausted: true,
        }
    }
}

impl Iterator for ProgressSteps {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.exhausted {
            return None;
        }
        let value = self.next;
        if value == self.end {
            self.exhausted = true;
        } else {
            self.next += 1;
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.exhausted {
            0
        } else {
            (self.end - self.next + 1) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgressSteps {}

impl std::iter::FusedIterator for ProgressSteps {}
