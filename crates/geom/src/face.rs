use std::fmt;

/// One of the four sides of a widget. Faces double as navigation directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Face {
    /// Left side.
    #[default]
    Left,
    /// Top side.
    Top,
    /// Right side.
    Right,
    /// Bottom side.
    Bottom,
}

/// The axis a face lies on.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Orientation {
    /// Left and Right faces.
    Horizontal,
    /// Top and Bottom faces.
    Vertical,
}

impl Face {
    /// All faces in storage order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Storage index of this face.
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
        }
    }

    /// The face on the other side of the same axis.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
        }
    }

    /// The axis this face lies on.
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Top | Self::Bottom => Orientation::Vertical,
        }
    }

    /// Is this the near (Left/Top) face of its axis?
    pub fn is_near(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    /// Are two faces on the same axis?
    pub fn is_parallel(self, other: Self) -> bool {
        self.orientation() == other.orientation()
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Left => "left",
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
        };
        write!(f, "{s}")
    }
}

impl Orientation {
    /// The near (Left/Top) face of this axis.
    pub fn near(self) -> Face {
        match self {
            Self::Horizontal => Face::Left,
            Self::Vertical => Face::Top,
        }
    }

    /// The far (Right/Bottom) face of this axis.
    pub fn far(self) -> Face {
        self.near().opposite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert!(face.is_parallel(face.opposite()));
            assert_ne!(face.is_near(), face.opposite().is_near());
        }
    }

    #[test]
    fn index_matches_storage_order() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn axis_faces() {
        assert_eq!(Orientation::Horizontal.near(), Face::Left);
        assert_eq!(Orientation::Vertical.far(), Face::Bottom);
        assert!(!Face::Left.is_parallel(Face::Top));
    }
}
