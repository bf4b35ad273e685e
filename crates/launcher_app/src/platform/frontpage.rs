/// Hooks the rest of the app uses to drive the programs launcher.
pub trait Frontpage {
    /// Draws the launcher overlay for this frame if it is visible.
    fn build_frontpage(&mut self, ctx: &egui::Context);
    /// Re-reads the program store into the launcher table.
    fn refresh_frontpage_list(&mut self);
    /// Dismisses the launcher; a pending welcome seed is scheduled from here.
    fn hide_frontpage(&mut self);
    fn run_program_by_name(&mut self, name: &str);
}
