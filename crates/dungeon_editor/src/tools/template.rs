//! Template tool: stamp the palette's template at the clicked cell

use super::{Edit, PointerEvent, ToolContext};
use dungeon_core::Rotation;
use tracing::debug;

/// Rotation applied to the template on placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateState {
    pub rotation: Rotation,
}

impl TemplateState {
    pub fn rotate_clockwise(&mut self) {
        self.rotation = self.rotation.clockwise();
    }
}

pub(super) fn handle(
    state: &TemplateState,
    event: &PointerEvent,
    ctx: &ToolContext<'_>,
) -> Option<Edit> {
    let origin = ctx.cell_at(event.pos)?;
    let Some(template) = ctx.palette.template.as_ref() else {
        debug!("template tool used without an active template");
        return None;
    };
    if template.is_full_map {
        return Some(Edit::Rejected {
            reason: format!(
                "'{}' is a full-map template and can only replace a whole floor",
                template.name
            ),
        });
    }

    let rotated = template.rotate(state.rotation);
    match rotated.placement(origin, ctx.floor) {
        Ok(updates) => ctx.batch(updates, &format!("Place template '{}'", template.name)),
        Err(err) => {
            debug!(error = %err, ?origin, "template placement refused");
            Some(Edit::Rejected {
                reason: err.to_string(),
            })
        }
    }
}
