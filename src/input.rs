//! Button input: logical buttons, debounced level sampling and press edges.
//!
//! The board support code reports debounced *levels* through
//! [`ButtonInput`]; the controller turns them into press *edges* with an
//! [`EdgeDetector`]. A button yields exactly one edge per press and must be
//! seen released before it can yield another (no auto-repeat).

/// One of the four front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Left,
    Right,
    Select,
    Back,
}

impl Button {
    /// All buttons, in routing priority order.
    pub const ALL: [Button; 4] = [Button::Left, Button::Right, Button::Select, Button::Back];

    #[inline]
    const fn mask(self) -> u8 {
        match self {
            Button::Left => 0b0001,
            Button::Right => 0b0010,
            Button::Select => 0b0100,
            Button::Back => 0b1000,
        }
    }
}

/// A set of buttons, used both for held levels and for press edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    /// Returns a copy of the set with `button` added.
    #[inline]
    pub const fn with(self, button: Button) -> Self {
        ButtonSet(self.0 | button.mask())
    }

    #[inline]
    pub const fn contains(&self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Adds or removes `button`.
    #[inline]
    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.0 |= button.mask();
        } else {
            self.0 &= !button.mask();
        }
    }

    /// Buttons in `self` that are not in `other`.
    #[inline]
    pub const fn difference(self, other: ButtonSet) -> Self {
        ButtonSet(self.0 & !other.0)
    }

    /// The highest-priority button in the set (Left, Right, Select, Back).
    pub fn first(&self) -> Option<Button> {
        Button::ALL.into_iter().find(|b| self.contains(*b))
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        ButtonSet::EMPTY.with(button)
    }
}

impl core::ops::BitOr for ButtonSet {
    type Output = ButtonSet;

    fn bitor(self, rhs: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 | rhs.0)
    }
}

impl core::ops::BitOr<Button> for Button {
    type Output = ButtonSet;

    fn bitor(self, rhs: Button) -> ButtonSet {
        ButtonSet::from(self).with(rhs)
    }
}

/// Trait for abstracting the debounced button hardware.
///
/// Implement this for your board. `sample` is called once per control
/// quantum and reports which buttons are currently held.
pub trait ButtonInput {
    fn sample(&mut self) -> ButtonSet;
}

/// Converts held levels into press edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    held: ButtonSet,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self {
            held: ButtonSet::EMPTY,
        }
    }

    /// Feeds one sample and returns the buttons that were pressed since the
    /// previous sample.
    pub fn update(&mut self, levels: ButtonSet) -> ButtonSet {
        let pressed = levels.difference(self.held);
        self.held = levels;
        pressed
    }

    /// Marks every button held in `levels` as already consumed; none of them
    /// edges again until it has been released.
    pub fn latch(&mut self, levels: ButtonSet) {
        self.held = self.held | levels;
    }
}

/// Raw, bouncing button levels straight from the pins.
pub trait RawButtons {
    fn read(&mut self) -> ButtonSet;
}

/// Per-button integrating debouncer.
///
/// A button's reported level changes only after the raw level has
/// disagreed with it for `threshold` consecutive samples.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    stable: ButtonSet,
    counts: [u8; 4],
    threshold: u8,
}

impl Debouncer {
    /// Creates a debouncer. A `threshold` of 0 or 1 passes levels straight through.
    pub const fn new(threshold: u8) -> Self {
        Self {
            stable: ButtonSet::EMPTY,
            counts: [0; 4],
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feeds one raw sample and returns the debounced levels.
    pub fn update(&mut self, raw: ButtonSet) -> ButtonSet {
        for (count, button) in self.counts.iter_mut().zip(Button::ALL) {
            let level = raw.contains(button);
            if level == self.stable.contains(button) {
                *count = 0;
                continue;
            }
            *count += 1;
            if *count >= self.threshold {
                self.stable.set(button, level);
                *count = 0;
            }
        }
        self.stable
    }

    /// Debounced levels as of the last update.
    pub fn levels(&self) -> ButtonSet {
        self.stable
    }
}

/// Adapts [`RawButtons`] into a [`ButtonInput`] through a [`Debouncer`].
pub struct DebouncedButtons<R: RawButtons> {
    raw: R,
    debouncer: Debouncer,
}

impl<R: RawButtons> DebouncedButtons<R> {
    pub fn new(raw: R, threshold: u8) -> Self {
        Self {
            raw,
            debouncer: Debouncer::new(threshold),
        }
    }

    /// Releases the raw pins.
    pub fn into_inner(self) -> R {
        self.raw
    }
}

impl<R: RawButtons> ButtonInput for DebouncedButtons<R> {
    fn sample(&mut self) -> ButtonSet {
        let raw = self.raw.read();
        self.debouncer.update(raw)
    }
}
