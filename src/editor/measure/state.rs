use bevy::prelude::*;

/// A straight measurement between two surface points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSegment {
    pub id: u32,
    pub start: Vec3,
    pub end: Vec3,
}

impl MeasurementSegment {
    pub fn distance(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Distance in world units with two decimals
    pub fn label(&self) -> String {
        format!("{:.2}", self.distance())
    }

    pub fn label_anchor(&self) -> Vec3 {
        self.start.lerp(self.end, 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasurePhase {
    #[default]
    Idle,
    /// Start is fixed, end follows the live surface hit
    Drawing(MeasurementSegment),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureOutcome {
    Started(u32),
    Finished(u32),
}

/// Two-click measurement drawing with a list of finished segments
#[derive(Resource, Debug, Default)]
pub struct MeasureTool {
    phase: MeasurePhase,
    finished: Vec<MeasurementSegment>,
    next_id: u32,
}

impl MeasureTool {
    pub fn phase(&self) -> MeasurePhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, MeasurePhase::Drawing(_))
    }

    pub fn drawing(&self) -> Option<&MeasurementSegment> {
        match &self.phase {
            MeasurePhase::Drawing(segment) => Some(segment),
            MeasurePhase::Idle => None,
        }
    }

    pub fn finished(&self) -> &[MeasurementSegment] {
        &self.finished
    }

    /// Finished segments followed by the one being drawn
    pub fn segments(&self) -> impl Iterator<Item = &MeasurementSegment> {
        self.finished.iter().chain(self.drawing())
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// First click starts a segment at `point`, second click finishes it there
    pub fn click(&mut self, point: Vec3) -> MeasureOutcome {
        match self.phase {
            MeasurePhase::Idle => {
                self.phase = MeasurePhase::Drawing(MeasurementSegment {
                    id: self.next_id,
                    start: point,
                    end: point,
                });
                MeasureOutcome::Started(self.next_id)
            }
            MeasurePhase::Drawing(mut segment) => {
                segment.end = point;
                self.finished.push(segment);
                self.phase = MeasurePhase::Idle;
                self.next_id += 1;
                MeasureOutcome::Finished(segment.id)
            }
        }
    }

    /// Move the free end of the drawing segment. A miss leaves it where it was.
    pub fn track(&mut self, point: Option<Vec3>) -> bool {
        match (&mut self.phase, point) {
            (MeasurePhase::Drawing(segment), Some(point)) if segment.end != point => {
                segment.end = point;
                true
            }
            _ => false,
        }
    }

    /// Discard the segment being drawn, keeping finished ones
    pub fn abandon_drawing(&mut self) -> Option<MeasurementSegment> {
        match std::mem::take(&mut self.phase) {
            MeasurePhase::Drawing(segment) => Some(segment),
            MeasurePhase::Idle => None,
        }
    }

    /// Drop every segment and restart ids from zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_label() {
        let segment = MeasurementSegment {
            id: 0,
            start: Vec3::ZERO,
            end: Vec3::new(3.0, 4.0, 0.0),
        };
        assert_eq!(segment.distance(), 5.0);
        assert_eq!(segment.label(), "5.00");
        assert_eq!(segment.label_anchor(), Vec3::new(1.5, 2.0, 0.0));
    }

    #[test]
    fn test_label_rounds_to_two_decimals() {
        let segment = MeasurementSegment {
            id: 0,
            start: Vec3::ZERO,
            end: Vec3::new(1.0 / 3.0, 0.0, 0.0),
        };
        assert_eq!(segment.label(), "0.33");
    }

    #[test]
    fn test_click_cycle() {
        let mut tool = MeasureTool::default();
        assert_eq!(tool.click(Vec3::ZERO), MeasureOutcome::Started(0));
        let drawing = tool.drawing().unwrap();
        assert_eq!(drawing.start, drawing.end);

        assert_eq!(tool.click(Vec3::X), MeasureOutcome::Finished(0));
        assert!(!tool.is_drawing());
        assert_eq!(tool.finished().len(), 1);
        assert_eq!(tool.finished()[0].end, Vec3::X);
        assert_eq!(tool.next_id(), 1);

        assert_eq!(tool.click(Vec3::Y), MeasureOutcome::Started(1));
    }

    #[test]
    fn test_track_follows_hit() {
        let mut tool = MeasureTool::default();
        tool.click(Vec3::ZERO);
        assert!(tool.track(Some(Vec3::new(3.0, 4.0, 0.0))));
        assert_eq!(tool.drawing().unwrap().label(), "5.00");
    }

    #[test]
    fn test_miss_keeps_last_geometry() {
        let mut tool = MeasureTool::default();
        tool.click(Vec3::ZERO);
        tool.track(Some(Vec3::X));
        assert!(!tool.track(None));
        assert!(tool.is_drawing());
        assert_eq!(tool.drawing().unwrap().end, Vec3::X);
    }

    #[test]
    fn test_track_while_idle_does_nothing() {
        let mut tool = MeasureTool::default();
        assert!(!tool.track(Some(Vec3::X)));
        assert_eq!(tool.phase(), MeasurePhase::Idle);
    }

    #[test]
    fn test_abandon_keeps_finished() {
        let mut tool = MeasureTool::default();
        tool.click(Vec3::ZERO);
        tool.click(Vec3::X);
        tool.click(Vec3::Y);
        let abandoned = tool.abandon_drawing().unwrap();
        assert_eq!(abandoned.id, 1);
        assert_eq!(tool.finished().len(), 1);
        assert_eq!(tool.next_id(), 1);
        assert!(tool.abandon_drawing().is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tool = MeasureTool::default();
        tool.click(Vec3::ZERO);
        tool.click(Vec3::X);
        tool.click(Vec3::Y);
        tool.reset();
        assert!(tool.finished().is_empty());
        assert!(!tool.is_drawing());
        assert_eq!(tool.next_id(), 0);
        assert_eq!(tool.segments().count(), 0);
    }

    #[test]
    fn test_segments_include_drawing() {
        let mut tool = MeasureTool::default();
        tool.click(Vec3::ZERO);
        tool.click(Vec3::X);
        tool.click(Vec3::Y);
        let ids: Vec<u32> = tool.segments().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
