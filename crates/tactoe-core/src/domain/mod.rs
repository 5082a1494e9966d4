//! Domain entities for the card tic-tac-toe client.
//!
//! This module contains pure game-state logic with no infrastructure
//! dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application (here: how the board, the
//!   hand, and the selection behave on the client).
//! - Has **no** imports from network libraries, file systems, timers, or
//!   rendering frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Code in outer layers (the session, the WebSocket adapter, the frontend)
//! depends on the domain, but the domain never depends on them.
//!
//! # Who writes what
//!
//! Every animated entity carries a [`geometry::Motion`]: a *current* position
//! (what is on screen right now) and a *target* position (where it should
//! end up).  Layout code ([`board`], [`hand`]) only ever writes targets.  The
//! [`animation`] driver is the only code that moves the current position.
//! Keeping the two apart means layout never needs to know about frame timing.

/// Per-frame easing of current positions toward targets.
pub mod animation;

/// The fixed 3×3 grid of slots and the markers placed on them.
pub mod board;

/// 2-D points and the current/target motion pair.
pub mod geometry;

/// The ordered set of cards the player holds.
pub mod hand;

/// Viewport size → sizes and spacings.
pub mod layout;

/// Which card (if any) is selected.
pub mod selection;
