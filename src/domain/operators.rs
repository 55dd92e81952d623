//! Concrete arithmetic/bitwise/comparison operator agents
//!
//! All operator inputs and outputs are `f64`; NaN is the in-band "no value"
//! sentinel. The bitwise family truncates a double to a 32-bit signed
//! integer with saturation; Rust's `as i32` float cast already saturates
//! out-of-range values to `i32::MAX`/`i32::MIN` and maps NaN to `0`, which is
//! exactly the semantics required here.

use super::agent::Agent;
use super::message::Message;

/// Truncate a double to a 32-bit signed integer with saturation.
fn to_i32_saturating(x: f64) -> i32 {
    x as i32
}

/// Two-slot state shared by every binary operator agent.
#[derive(Debug, Default, Clone, Copy)]
struct BinarySlots {
    v1: f64,
    v1_set: bool,
    v2: f64,
    v2_set: bool,
}

impl BinarySlots {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Route an arriving value into the slot matching `topic_name`.
    /// NaN clears that slot's set-flag instead of storing it. Returns true
    /// if both slots are now set.
    fn update(&mut self, which: Slot, num: f64) -> bool {
        match which {
            Slot::First => {
                if num.is_nan() {
                    self.v1_set = false;
                } else {
                    self.v1 = num;
                    self.v1_set = true;
                }
            }
            Slot::Second => {
                if num.is_nan() {
                    self.v2_set = false;
                } else {
                    self.v2 = num;
                    self.v2_set = true;
                }
            }
        }
        self.v1_set && self.v2_set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    First,
    Second,
}

/// Resolve which slot (if any) an arriving topic name feeds, honouring the
/// "fewer inputs than required -> silent no-op" contract: a `None` input
/// name can never match.
fn route(in1: &Option<String>, in2: &Option<String>, topic_name: &str) -> Option<Slot> {
    if in1.as_deref() == Some(topic_name) {
        Some(Slot::First)
    } else if in2.as_deref() == Some(topic_name) {
        Some(Slot::Second)
    } else {
        None
    }
}

/// `add(in1, in2 -> out)` — accumulating binary summation. Clears both
/// slots immediately after publishing.
pub struct AddAgent {
    name: String,
    in1: Option<String>,
    in2: Option<String>,
    out: Option<String>,
    slots: BinarySlots,
    publish: Box<dyn Fn(&str, Message) + Send>,
}

impl AddAgent {
    pub fn new(
        inputs: &[String],
        outputs: &[String],
        publish: Box<dyn Fn(&str, Message) + Send>,
    ) -> Self {
        Self {
            name: "add".to_string(),
            in1: inputs.first().cloned(),
            in2: inputs.get(1).cloned(),
            out: outputs.first().cloned(),
            slots: BinarySlots::default(),
            publish,
        }
    }
}

impl Agent for AddAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.slots.reset();
    }

    fn on_message(&mut self, topic_name: &str, message: &Message) {
        let Some(slot) = route(&self.in1, &self.in2, topic_name) else {
            return;
        };
        let num = message.num();
        if num.is_nan() {
            // add() only rejects NaN; it does not clear a previously-set slot.
            return;
        }
        let both_set = match slot {
            Slot::First => {
                self.slots.v1 = num;
                self.slots.v1_set = true;
                self.slots.v1_set && self.slots.v2_set
            }
            Slot::Second => {
                self.slots.v2 = num;
                self.slots.v2_set = true;
                self.slots.v1_set && self.slots.v2_set
            }
        };
        if both_set {
            if let Some(out) = &self.out {
                (self.publish)(out, Message::from_num(self.slots.v1 + self.slots.v2));
            }
            self.slots.reset();
        }
    }
}

/// `inc(in -> out)` — stateless immediate successor.
pub struct IncAgent {
    name: String,
    input: Option<String>,
    out: Option<String>,
    publish: Box<dyn Fn(&str, Message) + Send>,
}

impl IncAgent {
    pub fn new(
        inputs: &[String],
        outputs: &[String],
        publish: Box<dyn Fn(&str, Message) + Send>,
    ) -> Self {
        Self {
            name: "inc".to_string(),
            input: inputs.first().cloned(),
            out: outputs.first().cloned(),
            publish,
        }
    }
}

impl Agent for IncAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {}

    fn on_message(&mut self, topic_name: &str, message: &Message) {
        if self.input.as_deref() != Some(topic_name) {
            return;
        }
        let num = message.num();
        if num.is_nan() {
            return;
        }
        if let Some(out) = &self.out {
            (self.publish)(out, Message::from_num(num + 1.0));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

impl BitwiseOp {
    fn apply(self, a: i32, b: i32) -> i32 {
        match self {
            BitwiseOp::And => a & b,
            BitwiseOp::Or => a | b,
            BitwiseOp::Xor => a ^ b,
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            BitwiseOp::And => "and",
            BitwiseOp::Or => "or",
            BitwiseOp::Xor => "xor",
        }
    }
}

/// `and/or/xor(in1, in2 -> out)` — persistent binary bitwise. Slots are
/// *retained* after publish; a NaN arrival clears only that slot's flag.
pub struct BitwiseAgent {
    name: String,
    op: BitwiseOp,
    in1: Option<String>,
    in2: Option<String>,
    out: Option<String>,
    slots: BinarySlots,
    publish: Box<dyn Fn(&str, Message) + Send>,
}

impl BitwiseAgent {
    pub fn new(
        op: BitwiseOp,
        inputs: &[String],
        outputs: &[String],
        publish: Box<dyn Fn(&str, Message) + Send>,
    ) -> Self {
        Self {
            name: op.type_name().to_string(),
            op,
            in1: inputs.first().cloned(),
            in2: inputs.get(1).cloned(),
            out: outputs.first().cloned(),
            slots: BinarySlots::default(),
            publish,
        }
    }
}

impl Agent for BitwiseAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.slots.reset();
    }

    fn on_message(&mut self, topic_name: &str, message: &Message) {
        let Some(slot) = route(&self.in1, &self.in2, topic_name) else {
            return;
        };
        let both_set = self.slots.update(slot, message.num());
        if both_set {
            let a = to_i32_saturating(self.slots.v1);
            let b = to_i32_saturating(self.slots.v2);
            let result = self.op.apply(a, b);
            if let Some(out) = &self.out {
                (self.publish)(out, Message::from_num(result as f64));
            }
        }
    }
}

/// `not(in -> out)` — stateless immediate bitwise complement.
pub struct NotAgent {
    name: String,
    input: Option<String>,
    out: Option<String>,
    publish: Box<dyn Fn(&str, Message) + Send>,
}

impl NotAgent {
    pub fn new(
        inputs: &[String],
        outputs: &[String],
        publish: Box<dyn Fn(&str, Message) + Send>,
    ) -> Self {
        Self {
            name: "not".to_string(),
            input: inputs.first().cloned(),
            out: outputs.first().cloned(),
            publish,
        }
    }
}

impl Agent for NotAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {}

    fn on_message(&mut self, topic_name: &str, message: &Message) {
        if self.input.as_deref() != Some(topic_name) {
            return;
        }
        let num = message.num();
        if num.is_nan() {
            return;
        }
        let result = !to_i32_saturating(num);
        if let Some(out) = &self.out {
            (self.publish)(out, Message::from_num(result as f64));
        }
    }
}

/// `compare(in1, in2 -> out)` — persistent three-way compare: publishes
/// `+1`/`-1`/`0` for greater/less/equal. A NaN arrival clears that slot's
/// set-flag instead of publishing, so only the slot-NaN case suppresses
/// publication — an IEEE-754 equal comparison of two set, non-NaN slots
/// still publishes `0`.
pub struct CompareAgent {
    name: String,
    in1: Option<String>,
    in2: Option<String>,
    out: Option<String>,
    slots: BinarySlots,
    publish: Box<dyn Fn(&str, Message) + Send>,
}

impl CompareAgent {
    pub fn new(
        inputs: &[String],
        outputs: &[String],
        publish: Box<dyn Fn(&str, Message) + Send>,
    ) -> Self {
        Self {
            name: "compare".to_string(),
            in1: inputs.first().cloned(),
            in2: inputs.get(1).cloned(),
            out: outputs.first().cloned(),
            slots: BinarySlots::default(),
            publish,
        }
    }
}

impl Agent for CompareAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.slots.reset();
    }

    fn on_message(&mut self, topic_name: &str, message: &Message) {
        let Some(slot) = route(&self.in1, &self.in2, topic_name) else {
            return;
        };
        let both_set = self.slots.update(slot, message.num());
        if !both_set {
            return;
        }
        let result = if self.slots.v1 > self.slots.v2 {
            1.0
        } else if self.slots.v1 < self.slots.v2 {
            -1.0
        } else {
            0.0
        };
        if let Some(out) = &self.out {
            (self.publish)(out, Message::from_num(result));
        }
    }
}
