//! Hexapod scene with a shaped-text overlay
//!
//! One front leg wobbles, a looping sound follows its tip, and the camera
//! flies with WASD and mouse look. On top of the scene go an instruction
//! caption (host line text) and a paragraph of shaped text.

use std::f32::consts::PI;

use crate::config::{HexapodConfig, PlayConfig};
use crate::foundation::math::{aspect_projection, column, transform_point, Quat, UVec2, Vec2, Vec3};
use crate::audio::{LoopHandle, PositionalAudio};
use crate::input::{Button, InputEvent, KeyCode};
use crate::render::TextBackend;
use crate::scene::{DirectionalLight, SceneGraph, TransformId};
use crate::text::{FontBackend, FontFace, ParagraphStyle, PenPosition, TextOverlay};

use super::{report_overflow, Frame, Mode, ModeError};

/// Leg tip in the lower leg's local frame, measured on the model
const LEG_TIP: [f32; 3] = [-1.26137, -11.861, 0.0];

/// Distance at which the leg loop plays at half volume
const LOOP_HALF_VOLUME_RADIUS: f32 = 10.0;

/// Ramp for audio position updates, one 60 Hz frame
const AUDIO_RAMP: f32 = 1.0 / 60.0;

/// Caption glyph height in overlay units
const CAPTION_HEIGHT: f32 = 0.09;

const SCENE_CLEAR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Transform names of the animated leg, hip first
const LEG_NAMES: [&str; 3] = ["Hip.FL", "UpperLeg.FL", "LowerLeg.FL"];

fn scene_light() -> DirectionalLight {
    DirectionalLight {
        direction: Vec3::new(0.0, 0.0, -1.0),
        energy: Vec3::new(1.0, 1.0, 0.95),
    }
}

/// One animated joint: its transform and rest rotation
#[derive(Debug, Clone, Copy)]
struct Joint {
    id: TransformId,
    base_rotation: Quat,
}

impl Joint {
    fn find<S: SceneGraph>(scene: &S, name: &'static str) -> Result<Self, ModeError> {
        let id = scene.find_transform(name).ok_or(ModeError::MissingTransform(name))?;
        let base_rotation = scene.transform(id).ok_or(ModeError::MissingTransform(name))?.rotation;
        Ok(Self { id, base_rotation })
    }

    fn pose<S: SceneGraph>(&self, scene: &mut S, axis: &nalgebra::Unit<Vec3>, degrees: f32) {
        if let Some(transform) = scene.transform_mut(self.id) {
            transform.rotation = self.base_rotation * Quat::from_axis_angle(axis, degrees.to_radians());
        }
    }
}

/// 3D hexapod mode
pub struct HexapodMode<S: SceneGraph, A: PositionalAudio, F: FontBackend = FontFace> {
    scene: S,
    audio: A,
    text: TextOverlay<F>,
    hip: Joint,
    upper_leg: Joint,
    lower_leg: Joint,
    leg_tip_loop: LoopHandle,
    wobble: f32,
    left: Button,
    right: Button,
    up: Button,
    down: Button,
    mouse_captured: bool,
    settings: HexapodConfig,
    overflow_reported: bool,
}

impl<S: SceneGraph, A: PositionalAudio> HexapodMode<S, A, FontFace> {
    /// Build the mode from config, loading the font through the asset resolver
    pub fn from_config(scene: S, audio: A, config: &PlayConfig, backend: &mut dyn TextBackend) -> Result<Self, ModeError> {
        let assets = crate::assets::AssetPaths::new(&config.assets.root);
        let face = FontFace::load(assets.resolve(&config.font.path)?, config.font.size_px)?;
        Self::new(scene, audio, face, config, backend)
    }
}

impl<S: SceneGraph, A: PositionalAudio, F: FontBackend> HexapodMode<S, A, F> {
    /// Build the mode around a loaded scene and face
    ///
    /// Fails if the leg transforms are missing or the scene does not have
    /// exactly one camera. Starts the leg loop.
    pub fn new(
        scene: S,
        mut audio: A,
        face: F,
        config: &PlayConfig,
        backend: &mut dyn TextBackend,
    ) -> Result<Self, ModeError> {
        let [hip, upper_leg, lower_leg] = LEG_NAMES;
        let hip = Joint::find(&scene, hip)?;
        let upper_leg = Joint::find(&scene, upper_leg)?;
        let lower_leg = Joint::find(&scene, lower_leg)?;

        let cameras = scene.cameras().len();
        if cameras != 1 {
            return Err(ModeError::CameraCount(cameras));
        }

        let text = TextOverlay::new(face, config.font.baseline, config.text.color, backend)?;

        // position is refreshed every update
        let tip = leg_tip(&scene, lower_leg.id).unwrap_or_else(Vec3::zeros);
        let leg_tip_loop = audio.loop_3d(&config.hexapod.loop_sample, 1.0, tip, LOOP_HALF_VOLUME_RADIUS);
        log::info!("Hexapod mode ready; looping {} at the leg tip", config.hexapod.loop_sample);

        Ok(Self {
            scene,
            audio,
            text,
            hip,
            upper_leg,
            lower_leg,
            leg_tip_loop,
            wobble: 0.0,
            left: Button::default(),
            right: Button::default(),
            up: Button::default(),
            down: Button::default(),
            mouse_captured: false,
            settings: config.hexapod.clone(),
            overflow_reported: false,
        })
    }

    /// The scene
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The audio backend
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Whether mouse motion currently steers the camera
    ///
    /// Hosts mirror this into relative mouse mode.
    pub fn mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    /// Wobble phase in [0, 1)
    pub fn wobble(&self) -> f32 {
        self.wobble
    }

    /// World-space leg tip, if the lower leg is still in the scene
    pub fn leg_tip_position(&self) -> Option<Vec3> {
        leg_tip(&self.scene, self.lower_leg.id)
    }

    fn button_mut(&mut self, key: KeyCode) -> Option<&mut Button> {
        match key {
            KeyCode::A => Some(&mut self.left),
            KeyCode::D => Some(&mut self.right),
            KeyCode::W => Some(&mut self.up),
            KeyCode::S => Some(&mut self.down),
            _ => None,
        }
    }

    fn look(&mut self, motion: Vec2) {
        let Some(camera) = self.scene.cameras().first() else {
            return;
        };
        let (id, fovy) = (camera.transform, camera.fovy);
        if let Some(transform) = self.scene.transform_mut(id) {
            let yaw = Quat::from_axis_angle(&Vec3::y_axis(), -motion.x * fovy);
            let pitch = Quat::from_axis_angle(&Vec3::x_axis(), motion.y * fovy);
            transform.rotation = Quat::new_normalize((transform.rotation * yaw * pitch).into_inner());
        }
    }

    /// Unit-length (or zero) move direction from the held keys
    fn move_direction(&self) -> Vec2 {
        let axis = |negative: &Button, positive: &Button| match (negative.pressed, positive.pressed) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let direction = Vec2::new(axis(&self.left, &self.right), axis(&self.down, &self.up));
        if direction == Vec2::zeros() {
            direction
        } else {
            direction.normalize()
        }
    }
}

fn leg_tip<S: SceneGraph>(scene: &S, lower_leg: TransformId) -> Option<Vec3> {
    scene
        .local_to_world(lower_leg)
        .map(|m| transform_point(&m, Vec3::from(LEG_TIP)))
}

impl<S: SceneGraph, A: PositionalAudio, F: FontBackend> Mode for HexapodMode<S, A, F> {
    fn handle_event(&mut self, event: &InputEvent, window_size: UVec2) -> bool {
        match *event {
            InputEvent::KeyDown(KeyCode::Escape) => {
                self.mouse_captured = false;
                true
            }
            InputEvent::KeyDown(key) => match self.button_mut(key) {
                Some(button) => {
                    button.press();
                    true
                }
                None => false,
            },
            InputEvent::KeyUp(key) => match self.button_mut(key) {
                Some(button) => {
                    button.release();
                    true
                }
                None => false,
            },
            InputEvent::MouseButtonDown(_) if !self.mouse_captured => {
                self.mouse_captured = true;
                true
            }
            InputEvent::MouseMotion { xrel, yrel } if self.mouse_captured && window_size.y > 0 => {
                let height = window_size.y as f32;
                self.look(Vec2::new(xrel / height, -yrel / height));
                true
            }
            _ => false,
        }
    }

    fn update(&mut self, elapsed: f32) -> Result<(), ModeError> {
        // slowly cycles through [0, 1)
        self.wobble += elapsed / 10.0;
        self.wobble -= self.wobble.floor();

        let phase = self.wobble * 2.0 * PI;
        self.hip.pose(&mut self.scene, &Vec3::y_axis(), 5.0 * phase.sin());
        self.upper_leg.pose(&mut self.scene, &Vec3::z_axis(), 7.0 * (2.0 * phase).sin());
        self.lower_leg.pose(&mut self.scene, &Vec3::z_axis(), 10.0 * (3.0 * phase).sin());

        if let Some(tip) = self.leg_tip_position() {
            self.audio.set_loop_position(self.leg_tip_loop, tip, AUDIO_RAMP);
        }

        let step = self.move_direction() * self.settings.player_speed * elapsed;
        let camera = self.scene.cameras().first().map(|camera| camera.transform);
        if let Some(transform) = camera.and_then(|id| self.scene.transform_mut(id)) {
            let (right, forward) = (transform.right(), transform.forward());
            transform.position += step.x * right + step.y * forward;

            let frame = transform.make_local_to_parent();
            self.audio.set_listener(column(&frame, 3), column(&frame, 0), AUDIO_RAMP);
        }

        for button in [&mut self.left, &mut self.right, &mut self.up, &mut self.down] {
            button.clear_downs();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame<'_>) -> Result<(), ModeError> {
        let viewport = frame.drawable_size;
        let aspect = frame.aspect();
        if let Some(camera) = self.scene.cameras_mut().first_mut() {
            camera.aspect = aspect;
        }

        frame.backend().clear(SCENE_CLEAR_COLOR)?;
        self.scene.draw(0, &scene_light());

        if let Some(lines) = frame.line_overlay() {
            let projection = aspect_projection(aspect);
            let h = CAPTION_HEIGHT;
            let anchor = Vec3::new(-aspect + 0.1 * h, -1.0 + 0.1 * h, 0.0);
            let (x_axis, y_axis) = (Vec3::new(h, 0.0, 0.0), Vec3::new(0.0, h, 0.0));
            let offset = 2.0 / viewport.y.max(1) as f32;

            lines.draw_text(&projection, &self.settings.caption, anchor, x_axis, y_axis, [0x00, 0x00, 0x00, 0x00]);
            let highlight = anchor + Vec3::new(offset, offset, 0.0);
            lines.draw_text(&projection, &self.settings.caption, highlight, x_axis, y_axis, [0xff, 0xff, 0xff, 0x00]);
        }

        let drawn = self
            .text
            .draw_paragraph(
                frame.backend(),
                viewport,
                &self.settings.overlay_lines,
                PenPosition::from_array(self.settings.overlay_origin),
                ParagraphStyle::FULL_LINES,
            )
            .map(|stats| log::trace!("Hexapod overlay: {:?}", stats));
        report_overflow(drawn, &mut self.overflow_reported)?;
        Ok(())
    }

    fn cleanup(&mut self, backend: &mut dyn TextBackend) {
        self.text.release(backend);
    }
}
