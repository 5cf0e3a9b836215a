//! Widget showcase
//!
//! Builds a scene with panels, buttons, an input field and a scrolling grid,
//! then drives a scripted sequence of input snapshots through the frame loop
//! against the recording backend and logs the resulting draw list.

use lantern_engine::effects::EffectId;
use lantern_engine::foundation::logging;
use lantern_engine::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;

const CARD_CENTER: (f32, f32) = (1000.0, 160.0);
const CARD_SIZE: (f32, f32) = (200.0, 120.0);

#[derive(Default)]
struct Showcase {
    state: SceneState,
    play: Option<ElementId>,
    quit: Option<ElementId>,
    field: Option<ElementId>,
    status: Option<ElementId>,
    card: Option<ElementId>,
    pop: Option<EffectId>,
}

impl Showcase {
    fn start_pop_in(&mut self) {
        let effect = PopInEffect::new(Vec2::zeros(), Vec2::new(1.2, 1.2), Vec2::new(1.0, 1.0), 0.6);
        if let Some(previous) = self.pop.replace(self.state.effects.add(effect)) {
            self.state.effects.remove(previous);
        }
    }

    fn card_scale(&mut self) -> Vec2 {
        let scale = self
            .pop
            .and_then(|id| self.state.effects.get::<PopInEffect>(id))
            .map(PopInEffect::current_scale);

        if scale.is_none() {
            self.pop = None;
        }
        scale.unwrap_or_else(|| Vec2::new(1.0, 1.0))
    }

    fn set_status(&self, tree: &mut UiTree, text: String) {
        if let Some(label) = self.status.and_then(|id| tree.widget_as_mut::<Label>(id)) {
            label.text = text;
        }
    }

    fn handle(&mut self, tree: &mut UiTree, event: &UiEvent) {
        match event {
            UiEvent::Clicked(id) if Some(*id) == self.play => {
                log::info!("Play clicked, replaying pop-in");
                self.start_pop_in();
                self.set_status(tree, "Playing".to_string());
            }
            UiEvent::Clicked(id) if Some(*id) == self.quit => {
                log::info!("Quit requested");
                self.set_status(tree, "Goodbye".to_string());
            }
            UiEvent::TextChanged { id } if Some(*id) == self.field => {
                let text = tree
                    .widget_as::<InputField>(*id)
                    .map(|field| field.text.clone())
                    .unwrap_or_default();
                log::info!("Name field now reads {:?}", text);
                self.set_status(tree, format!("Hello, {}", text));
            }
            UiEvent::ClipboardSet(text) => log::info!("Clipboard <- {:?}", text),
            other => log::debug!("{:?}", other),
        }
    }
}

impl Scene for Showcase {
    fn state(&self) -> &SceneState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    fn load(&mut self, tree: &mut UiTree, config: &EngineConfig) {
        let width = config.virtual_width as f32;
        let height = config.virtual_height as f32;

        let background = tree.insert(
            ElementNode::new(Panel::with_color(color::rgba8(24, 26, 33, 255)))
                .sized(width, height)
                .ordered(-1, 0),
        );
        let title = tree.insert(ElementNode::new(Label::new(config.title.clone())).at(40.0, 30.0));
        tree.add_child(background, title);

        let play = tree.insert(ElementNode::new(Button::new("Play")).at(40.0, 100.0).sized(160.0, 40.0));
        let quit = tree.insert(ElementNode::new(Button::new("Quit")).at(40.0, 150.0).sized(160.0, 40.0));
        let field = tree.insert(ElementNode::new(InputField::default()).at(40.0, 220.0).sized(240.0, 30.0));
        let status = tree.insert(ElementNode::new(Label::new("Type your name")).at(40.0, 260.0));

        let mut view = ScrollView::default();
        view.content_size = ContentSize::Fixed(Vec2::new(420.0, 430.0));
        let scroll = tree.insert(ElementNode::new(view).at(400.0, 100.0).sized(420.0, 300.0));

        let grid = tree.insert(ElementNode::new(
            LayoutContainer::grid(4)
                .with_padding(10.0, 10.0)
                .with_spacing(10.0, 10.0)
                .with_area(420.0, 430.0),
        ));
        tree.add_child(scroll, grid);
        for index in 0..24 {
            let tile = if index % 3 == 0 {
                tree.create(Button::new(format!("Item {}", index)))
            } else {
                let shade = 60 + (index * 7) as u8;
                tree.create(Panel::with_color(color::rgba8(shade, 90, 140, 255)))
            };
            tree.add_child(grid, tile);
        }

        let card = tree.insert(
            ElementNode::new(Panel::with_color(color::rgba8(230, 180, 60, 255))).ordered(1, 0),
        );
        let caption = tree.insert(ElementNode::new(Label::new("New!")).at(12.0, 10.0));
        tree.add_child(card, caption);

        for id in [background, play, quit, field, status, scroll, card] {
            self.state.ui.add_element(tree, id);
        }

        self.play = Some(play);
        self.quit = Some(quit);
        self.field = Some(field);
        self.status = Some(status);
        self.card = Some(card);
        self.start_pop_in();

        log::info!("Showcase loaded with {} elements", tree.len());
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>) {
        for event in ctx.events.drain() {
            self.handle(ctx.tree, &event);
        }

        let scale = self.card_scale();
        if let Some(card) = self.card {
            let size = Vec2::new(CARD_SIZE.0, CARD_SIZE.1).component_mul(&scale);
            let center = Vec2::new(CARD_CENTER.0, CARD_CENTER.1);
            ctx.tree.set_size(card, size);
            ctx.tree.set_local_position(card, center - size * 0.5);
        }
    }

    fn render_ui(&mut self, ctx: &mut RenderContext<'_>) {
        let fps = format!("frame {}", ctx.clock.frame_count());
        ctx.backend
            .draw_text(FontHandle::default(), &fps, Vec2::new(1180.0, 700.0), color::white(), 1.0);
    }
}

struct ShowcaseApp;

impl Application for ShowcaseApp {
    fn setup_scenes(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        engine.add_scene(Showcase::default(), true)?;
        Ok(())
    }
}

/// Scripted input: hover and click Play, type a name, drag the grid, wheel, click Quit
fn script() -> Vec<InputSnapshot> {
    let mut frames = Vec::new();

    let idle = InputSnapshot::builder().pointer(0.0, 0.0).build();
    frames.push(idle.clone());

    let hover = idle.next_frame().pointer(120.0, 120.0).build();
    let press = hover.next_frame().press(MouseButton::Left).build();
    let release = press.next_frame().release(MouseButton::Left).build();
    frames.extend([hover, press, release.clone()]);

    let focus = release
        .next_frame()
        .pointer(60.0, 235.0)
        .press(MouseButton::Left)
        .build();
    let mut typed = focus.next_frame().release(MouseButton::Left);
    for key in [KeyCode::S, KeyCode::A, KeyCode::M] {
        typed = typed.key_press(key);
    }
    let typed = typed.build();
    let settled = typed
        .next_frame()
        .key_release(KeyCode::S)
        .key_release(KeyCode::A)
        .key_release(KeyCode::M)
        .build();
    frames.extend([focus, typed, settled.clone()]);

    let mut drag = settled
        .next_frame()
        .pointer(600.0, 350.0)
        .press(MouseButton::Left)
        .build();
    frames.push(drag.clone());
    for step in 1..=4 {
        drag = drag.next_frame().pointer(600.0, 350.0 - 30.0 * step as f32).build();
        frames.push(drag.clone());
    }
    let mut coast = drag.next_frame().release(MouseButton::Left).build();
    frames.push(coast.clone());
    for _ in 0..10 {
        coast = coast.next_frame().build();
        frames.push(coast.clone());
    }

    let wheel = coast.next_frame().pointer(600.0, 200.0).wheel(0.0, 3.0).build();
    let to_quit = wheel.next_frame().pointer(100.0, 170.0).build();
    let quit = to_quit.next_frame().press(MouseButton::Left).build();
    let done = quit.next_frame().release(MouseButton::Left).build();
    frames.extend([wheel, to_quit, quit, done]);

    frames
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_default("info");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    let (width, height) = (config.virtual_width as f32, config.virtual_height as f32);

    let mut engine = Engine::with_application(config, &mut ShowcaseApp)?;
    let mut backend = RecordingBackend::with_surface(width, height);
    let mut clock = FrameClock::new();

    let frames = script();
    let last = frames.len() - 1;
    for (index, input) in frames.iter().enumerate() {
        clock.advance(FRAME_TIME);
        engine.update(input, &clock, &backend);
        engine.render(&mut backend, input, &clock);

        let commands = backend.take_commands();
        log::info!(
            "Frame {:>2}: {} draw commands, {} quads",
            index,
            commands.len(),
            commands.iter().filter(|c| matches!(c, DrawCommand::Quad { .. })).count()
        );

        if index == last {
            for command in &commands {
                log::info!("  {:?}", command);
            }
        }
    }

    log::info!("Presented into {:?}", engine.client_bounds());
    Ok(())
}
