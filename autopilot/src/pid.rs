#[derive(Default, Debug)]
pub struct PID {
    kp: f32,
    ki: f32,
    kd: f32,
    integral: f32,
    last_error: f32,
    max_output: f32,
}

impl PID {
    /// Create a controller. `max_output` of zero means unlimited.
    pub fn new(kp: f32, ki: f32, kd: f32, max_output: f32) -> Self {
        PID {
            kp,
            ki,
            kd,
            integral: 0.0,
            last_error: 0.0,
            max_output,
        }
    }

    pub fn update(&mut self, error: f32, dt: f32) -> f32 {
        if dt <= 0.0 || !dt.is_finite() || !error.is_finite() {
            return 0.0;
        }

        self.integral += error * dt;
        let derivative = (error - self.last_error) / dt;
        self.last_error = error;

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        if self.max_output > 0.0 {
            output.clamp(-self.max_output, self.max_output)
        } else {
            output
        }
    }

    pub fn set_gains(&mut self, kp: f32, ki: f32, kd: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    pub fn get_gains(&self) -> (f32, f32, f32) {
        (self.kp, self.ki, self.kd)
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_limited() {
        let mut pid = PID::new(10.0, 0.0, 0.0, 1.0);
        assert_eq!(pid.update(0.5, 0.1), 1.0, "output should clamp to max_output");
        assert_eq!(pid.update(-0.5, 0.1), -1.0);
    }

    #[test]
    fn test_invalid_dt_yields_zero() {
        let mut pid = PID::new(1.0, 0.1, 0.01, 0.0);
        assert_eq!(pid.update(1.0, 0.0), 0.0, "zero dt should not divide");
        assert_eq!(pid.update(f32::NAN, 0.1), 0.0);
        assert!(pid.update(1.0, 0.1) > 0.0);

        pid.reset();
        pid.set_gains(2.0, 0.0, 0.0);
        assert_eq!(pid.get_gains(), (2.0, 0.0, 0.0));
        assert_eq!(pid.update(0.25, 0.1), 0.5);
    }
}
