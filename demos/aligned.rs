use std::{alloc::Layout, cell::Cell, io::Read, ptr::NonNull};

use libc::sbrk;
use raligned::{AlignedAllocator, BackingAllocator, LibcAllocator};

/// Libc backing that reports every block it hands out or takes back, so the
/// demo can show where the aligned pointer lands inside it.
struct Verbose {
  last_block: Cell<usize>,
}

impl BackingAllocator for Verbose {
  fn allocate_unaligned(
    &self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    let block = LibcAllocator.allocate_unaligned(size)?;
    println!("    backing malloc({}) = {:?}", size, block);
    self.last_block.set(block.as_ptr() as usize);
    Some(block)
  }

  unsafe fn free_unaligned(
    &self,
    block: NonNull<u8>,
  ) {
    println!("    backing free({:?})", block);
    unsafe { LibcAllocator.free_unaligned(block) }
  }
}

/// Waits until the user presses ENTER, but only when run with `--step`.
fn block_until_enter_pressed(step: bool) {
  if step {
    println!("\n>>> Press ENTER to continue...");
    let _ = std::io::stdin().bytes().next();
  }
}

/// Prints the current program break using `sbrk(0)`.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() {
  let step = std::env::args().any(|arg| arg == "--step");
  let allocator = AlignedAllocator::with_backing(Verbose {
    last_block: Cell::new(0),
  });

  unsafe { print_program_break("start") };
  block_until_enter_pressed(step);

  // Alignment 1 and 2 are promoted to 4; the rest are honored as asked.
  let requests = [(3, 1), (12, 2), (100, 16), (64, 64), (1000, 4096)];
  let mut live = Vec::new();

  for (i, (size, alignment)) in requests.into_iter().enumerate() {
    println!("\n[{}] allocate_aligned(size = {}, alignment = {})", i + 1, size, alignment);

    let ptr = match allocator.allocate_aligned(size, alignment) {
      Ok(ptr) => ptr,
      Err(error) => {
        println!("    failed: {}", error);
        continue;
      }
    };

    let block = allocator.backing().last_block.get();
    let address = ptr.as_ptr() as usize;
    let field = unsafe { ptr.sub(2).cast::<u16>().read() };

    println!(
      "    ptr = {:#X}, ptr % {} = {}, offset field = {} (ptr - block = {})",
      address,
      alignment.max(4),
      address % alignment.max(4),
      field,
      address - block
    );

    unsafe { ptr.as_ptr().write_bytes(0xAB, size) };
    live.push(ptr);

    block_until_enter_pressed(step);
  }

  println!("\n[{}] allocate_aligned(size = 0, alignment = 8)", requests.len() + 1);
  if let Err(error) = allocator.allocate_aligned(0, 8) {
    println!("    rejected: {}", error);
  }

  let layout = Layout::new::<[u64; 8]>();
  println!("\n[{}] allocate_layout({:?})", requests.len() + 2, layout);
  if let Ok(ptr) = allocator.allocate_layout(layout) {
    live.push(ptr);
  }

  block_until_enter_pressed(step);

  println!("\n[free] releasing {} allocations", live.len());
  for ptr in live {
    unsafe { allocator.free_aligned(ptr) };
  }

  unsafe { print_program_break("end") };
}
