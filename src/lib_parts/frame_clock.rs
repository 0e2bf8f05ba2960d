use super::*;

impl Page {
    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn set_frame_interval(&mut self, interval_ms: i64) -> Result<()> {
        if interval_ms <= 0 {
            return Err(Error::InvalidOption(format!(
                "set_frame_interval requires a positive interval (got {interval_ms})"
            )));
        }
        self.scheduler.frame_interval_ms = interval_ms;
        Ok(())
    }

    pub fn set_frame_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::InvalidOption(
                "set_frame_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.frame_step_limit = max_steps;
        Ok(())
    }

    /// Moves the clock forward by `delta_ms`, running one animation frame per
    /// frame interval on the way.
    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        let target = from.saturating_add(delta_ms);
        let interval = self.scheduler.frame_interval_ms;

        let mut steps = 0usize;
        while !self.scheduler.animations.is_empty()
            && self.scheduler.now_ms.saturating_add(interval) <= target
        {
            steps += 1;
            if steps > self.scheduler.frame_step_limit {
                return Err(self.frame_step_limit_error(steps));
            }
            self.scheduler.now_ms += interval;
            stacker::grow(32 * 1024 * 1024, || self.run_frame())?;
        }

        let stepped_to = self.scheduler.now_ms;
        self.scheduler.now_ms = target;
        if target > stepped_to && !self.scheduler.animations.is_empty() {
            steps += 1;
            stacker::grow(32 * 1024 * 1024, || self.run_frame())?;
        }

        self.trace_frame_line(format!(
            "[frame] advance delta_ms={} from={} to={} frames={}",
            delta_ms, from, self.scheduler.now_ms, steps
        ));
        Ok(())
    }

    /// Runs frames until every animation has finished.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        let mut steps = 0usize;
        while !self.scheduler.animations.is_empty() {
            steps += 1;
            if steps > self.scheduler.frame_step_limit {
                return Err(self.frame_step_limit_error(steps));
            }
            self.scheduler.now_ms = self
                .scheduler
                .now_ms
                .saturating_add(self.scheduler.frame_interval_ms);
            stacker::grow(32 * 1024 * 1024, || self.run_frame())?;
        }
        self.trace_frame_line(format!(
            "[frame] flush from={} to={} frames={}",
            from, self.scheduler.now_ms, steps
        ));
        Ok(())
    }

    pub(crate) fn start_height_animation(
        &mut self,
        select: SelectId,
        node: NodeId,
        from: f64,
        to: f64,
        duration_ms: i64,
        purpose: AnimationPurpose,
    ) -> Result<u64> {
        let id = self.scheduler.allocate_animation_id();
        let animation = HeightAnimation {
            id,
            select,
            node,
            from,
            to,
            started_at: self.scheduler.now_ms,
            duration_ms,
            purpose,
        };
        self.dom.style_set(node, "height", &format_px(from))?;
        self.trace_frame_line(format!(
            "[frame] start id={} purpose={:?} node={} from={} to={} duration_ms={}",
            id,
            purpose,
            self.trace_node_label(node),
            from,
            to,
            duration_ms
        ));

        if animation.is_finished_at(self.scheduler.now_ms) {
            self.dom.style_set(node, "height", &format_px(to))?;
            self.complete_animation(&animation)?;
            return Ok(id);
        }
        self.scheduler.animations.push(animation);
        Ok(id)
    }

    fn run_frame(&mut self) -> Result<()> {
        let now = self.scheduler.now_ms;
        let ids = self
            .scheduler
            .animations
            .iter()
            .map(|animation| animation.id)
            .collect::<Vec<_>>();

        for id in ids {
            // Completing one animation can cancel another.
            let Some(animation) = self
                .scheduler
                .animations
                .iter()
                .find(|animation| animation.id == id)
                .cloned()
            else {
                continue;
            };

            let height = animation.height_at(now);
            self.dom.style_set(animation.node, "height", &format_px(height))?;
            self.trace_frame_line(format!(
                "[frame] tick id={} now_ms={} height={}",
                id,
                now,
                format_px(height)
            ));

            if animation.is_finished_at(now) {
                self.scheduler.cancel_animation(id);
                self.complete_animation(&animation)?;
            }
        }
        Ok(())
    }

    fn complete_animation(&mut self, animation: &HeightAnimation) -> Result<()> {
        self.trace_frame_line(format!(
            "[frame] done id={} purpose={:?} now_ms={}",
            animation.id, animation.purpose, self.scheduler.now_ms
        ));
        match animation.purpose {
            AnimationPurpose::Open => self.on_open_complete(animation.select),
            AnimationPurpose::Close => self.finish_close(animation.select),
        }
    }

    fn frame_step_limit_error(&self, steps: usize) -> Error {
        let next_animation = self
            .scheduler
            .animations
            .first()
            .map(|animation| {
                format!(
                    "id={},purpose={:?},started_at={},duration_ms={}",
                    animation.id, animation.purpose, animation.started_at, animation.duration_ms
                )
            })
            .unwrap_or_else(|| "none".into());
        Error::Runtime(format!(
            "frame loop exceeded max steps: limit={}, steps={steps}, now_ms={}, pending_animations={}, next_animation={}",
            self.scheduler.frame_step_limit,
            self.scheduler.now_ms,
            self.scheduler.animations.len(),
            next_animation
        ))
    }
}
